//! Domains that must always be served over HTTPS
//!
//! Browsers ship an HSTS preload entry for several top-level domains, so a
//! plain HTTP route on those domains is unreachable. Operators can extend the
//! set with their own suffixes (e.g. the cluster's generated app domain).

use crate::host::is_any_host;
use serde::{Deserialize, Serialize};

/// Top-level domains on the HSTS preload list
pub const HSTS_PRELOADED_TLDS: &[&str] = &[
    "app",
    "bank",
    "boo",
    "channel",
    "dad",
    "day",
    "dev",
    "esq",
    "foo",
    "gle",
    "insurance",
    "meme",
    "mov",
    "new",
    "nexus",
    "page",
    "phd",
    "prof",
    "rsvp",
    "zip",
];

/// Classification of domains that require HTTPS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceHttpsDomains {
    /// Top-level domains, without the leading dot
    pub tlds: Vec<String>,
    /// Additional domain suffixes, e.g. `apps.example.com`
    pub suffixes: Vec<String>,
}

impl Default for ForceHttpsDomains {
    fn default() -> Self {
        Self {
            tlds: HSTS_PRELOADED_TLDS.iter().map(|tld| tld.to_string()).collect(),
            suffixes: Vec::new(),
        }
    }
}

impl ForceHttpsDomains {
    /// A classification that forces nothing
    pub fn none() -> Self {
        Self {
            tlds: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }

    /// Check whether a single host must be served over HTTPS
    pub fn requires_https(&self, host: &str) -> bool {
        if is_any_host(host) || host.is_empty() {
            return false;
        }

        let host = host.trim_end_matches('.').to_ascii_lowercase();

        let tld_forced = host
            .rsplit_once('.')
            .map(|(_, tld)| self.tlds.iter().any(|t| t.eq_ignore_ascii_case(tld)))
            .unwrap_or(false);

        tld_forced
            || self
                .suffixes
                .iter()
                .map(|suffix| suffix.trim_start_matches('.').to_ascii_lowercase())
                .any(|suffix| host == suffix || host.ends_with(&format!(".{}", suffix)))
    }

    /// Return the hosts that must be served over HTTPS, in input order
    pub fn includes_force_https_domain<S: AsRef<str>>(&self, hosts: &[S]) -> Vec<String> {
        hosts
            .iter()
            .map(AsRef::as_ref)
            .filter(|host| self.requires_https(host))
            .map(str::to_string)
            .collect()
    }
}
