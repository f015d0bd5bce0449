//! Cross-origin allowlist.
//!
//! Loaded once at startup from a comma-separated list and never mutated.
//! Matching is exact on the serialized origin (`scheme://host[:port]`); a
//! trailing `/` in configuration is tolerated because it is a common typo.

use std::collections::BTreeSet;

/// Set of origins permitted to call the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    origins: BTreeSet<String>,
}

impl Allowlist {
    /// Parse a comma-separated origin list. Blank entries are ignored.
    #[must_use]
    pub fn parse(csv: &str) -> Self {
        let origins = csv
            .split(',')
            .map(|entry| entry.trim().trim_end_matches('/'))
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect();
        Self { origins }
    }

    /// Whether `origin` is permitted. The literal `null` origin never is.
    #[must_use]
    pub fn contains(&self, origin: &str) -> bool {
        origin != "null" && self.origins.contains(origin)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.origins.len()
    }
}
