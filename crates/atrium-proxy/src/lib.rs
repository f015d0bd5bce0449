//! `Atrium` contact proxy.
//!
//! A small edge service that sits between the marketing site's contact form
//! and a third-party form-delivery API. It checks the caller's origin,
//! sanitizes and validates the submission, then relays it upstream with a
//! credential the browser never sees.

pub mod allowlist;
pub mod config;
pub mod error;
pub mod payload;
pub mod relay;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod validate;
