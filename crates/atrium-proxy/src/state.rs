//! Shared application state for the `Atrium` proxy.
//!
//! A single [`AppState`] is built at startup and shared across handlers via
//! `Arc`. Nothing in it changes after construction.

use std::sync::Arc;

use crate::allowlist::Allowlist;
use crate::config::ProxyConfig;
use crate::relay::Relay;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Origins permitted to call the proxy.
    pub allowlist: Allowlist,
    /// Relay credential. Absent means every relay attempt fails closed.
    pub access_key: Option<String>,
    /// Upstream delivery.
    pub relay: Arc<dyn Relay>,
    /// Request body cap in bytes.
    pub max_body_bytes: usize,
    /// In-flight request cap applied by the router.
    pub max_concurrency: usize,
}

impl AppState {
    /// Build state from configuration and a relay implementation.
    #[must_use]
    pub fn new(config: &ProxyConfig, relay: Arc<dyn Relay>) -> Self {
        Self {
            allowlist: config.allowed_origins.clone(),
            access_key: config.access_key.clone(),
            relay,
            max_body_bytes: config.max_body_bytes,
            max_concurrency: config.max_concurrency,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("allowlist", &self.allowlist)
            .field("access_key", &self.access_key.as_ref().map(|_| "[redacted]"))
            .field("max_body_bytes", &self.max_body_bytes)
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}
