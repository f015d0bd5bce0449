//! Proxy configuration for `Atrium`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `ATRIUM_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use crate::allowlist::Allowlist;

/// Default form-delivery endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.web3forms.com/submit";

const DEFAULT_PORT: u16 = 8787;

/// Proxy configuration.
#[derive(Clone)]
pub struct ProxyConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Relay credential. `None` makes every submission fail closed.
    pub access_key: Option<String>,
    /// Origins allowed to call the proxy cross-origin.
    pub allowed_origins: Allowlist,
    /// Form-delivery endpoint.
    pub upstream_url: String,
    /// Upper bound on one relay round trip.
    pub upstream_timeout: Duration,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
    /// Maximum number of requests handled at once.
    pub max_concurrency: usize,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("access_key", &self.access_key.as_ref().map(|_| "[redacted]"))
            .field("allowed_origins", &self.allowed_origins)
            .field("upstream_url", &self.upstream_url)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

impl ProxyConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (platform convention, binds to `0.0.0.0`)
    /// - `ATRIUM_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8787`)
    /// - `ATRIUM_LOG_LEVEL`: log filter (default: `info`)
    /// - `ATRIUM_ACCESS_KEY`: form-delivery access key (required to relay)
    /// - `ATRIUM_ALLOWED_ORIGINS`: comma-separated origin allowlist
    /// - `ATRIUM_UPSTREAM_URL`: form-delivery endpoint (default: Web3Forms)
    /// - `ATRIUM_UPSTREAM_TIMEOUT_SECS`: relay timeout (default: `10`)
    /// - `ATRIUM_MAX_BODY_BYTES`: request body cap (default: `65536`)
    /// - `ATRIUM_MAX_CONCURRENCY`: in-flight request cap (default: `64`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Priority: ATRIUM_BIND_ADDR > PORT > default 127.0.0.1:8787
        let bind_addr = if let Some(addr) = lookup("ATRIUM_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        };

        let log_level = lookup("ATRIUM_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let access_key = lookup("ATRIUM_ACCESS_KEY")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());

        let allowed_origins =
            Allowlist::parse(&lookup("ATRIUM_ALLOWED_ORIGINS").unwrap_or_default());

        let upstream_url = lookup("ATRIUM_UPSTREAM_URL")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_owned());

        let upstream_timeout = Duration::from_secs(
            lookup("ATRIUM_UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(10),
        );

        let max_body_bytes = lookup("ATRIUM_MAX_BODY_BYTES")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(64 * 1024);

        let max_concurrency = lookup("ATRIUM_MAX_CONCURRENCY")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(64);

        Self {
            bind_addr,
            log_level,
            access_key,
            allowed_origins,
            upstream_url,
            upstream_timeout,
            max_body_bytes,
            max_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ProxyConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ProxyConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8787)));
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.access_key.is_none());
        assert!(cfg.allowed_origins.is_empty());
        assert_eq!(cfg.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(10));
        assert_eq!(cfg.max_body_bytes, 65_536);
        assert_eq!(cfg.max_concurrency, 64);
    }

    #[test]
    fn bind_addr_beats_port() {
        let cfg = config(&[("PORT", "9000"), ("ATRIUM_BIND_ADDR", "127.0.0.1:7000")]);
        assert_eq!(cfg.bind_addr.port(), 7000);
        let cfg = config(&[("PORT", "9000")]);
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
    }

    #[test]
    fn blank_access_key_counts_as_missing() {
        assert!(config(&[("ATRIUM_ACCESS_KEY", "   ")]).access_key.is_none());
        assert_eq!(
            config(&[("ATRIUM_ACCESS_KEY", " key-123 ")]).access_key.as_deref(),
            Some("key-123")
        );
    }

    #[test]
    fn origins_are_parsed() {
        let cfg = config(&[(
            "ATRIUM_ALLOWED_ORIGINS",
            "https://example.com, https://www.example.com",
        )]);
        assert!(cfg.allowed_origins.contains("https://www.example.com"));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config(&[
            ("ATRIUM_UPSTREAM_TIMEOUT_SECS", "0"),
            ("ATRIUM_MAX_BODY_BYTES", "lots"),
        ]);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(10));
        assert_eq!(cfg.max_body_bytes, 65_536);
    }

    #[test]
    fn debug_redacts_access_key() {
        let cfg = config(&[("ATRIUM_ACCESS_KEY", "super-secret")]);
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
