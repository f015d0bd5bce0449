//! Contact form payloads.
//!
//! [`ContactPayload`] is the untrusted request body: every field is optional
//! and may hold any JSON type. [`SanitizedSubmission`] is the trusted,
//! request-scoped result of running it through [`crate::sanitize`].

use serde::Deserialize;
use serde_json::Value;

use crate::sanitize::{
    MAX_COMPANY, MAX_HONEYPOT, MAX_INQUIRY_TYPE, MAX_MESSAGE, MAX_NAME, MAX_PHONE,
    sanitize_email, sanitize_services, sanitize_value,
};

/// Raw contact form body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub company: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub phone: Value,
    #[serde(default)]
    pub inquiry_type: Value,
    #[serde(default)]
    pub services: Value,
    #[serde(default)]
    pub message: Value,
    /// Hidden field real visitors never fill in.
    #[serde(default, alias = "botcheck")]
    pub honeypot: Value,
}

impl ContactPayload {
    /// Parse a request body.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not JSON, is not a JSON
    /// object, or repeats the honeypot under both of its names.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Whether the honeypot holds anything after sanitization.
    #[must_use]
    pub fn is_bot(&self) -> bool {
        !sanitize_value(&self.honeypot, MAX_HONEYPOT).is_empty()
    }
}

/// Sanitized, length-capped submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub inquiry_type: String,
    pub services: Vec<String>,
    pub message: String,
}

impl SanitizedSubmission {
    #[must_use]
    pub fn from_payload(payload: &ContactPayload) -> Self {
        Self {
            name: sanitize_value(&payload.name, MAX_NAME),
            company: sanitize_value(&payload.company, MAX_COMPANY),
            email: sanitize_email(&payload.email),
            phone: sanitize_value(&payload.phone, MAX_PHONE),
            inquiry_type: sanitize_value(&payload.inquiry_type, MAX_INQUIRY_TYPE),
            services: sanitize_services(&payload.services),
            message: sanitize_value(&payload.message, MAX_MESSAGE),
        }
    }
}
