//! Route host and certificate domain logic
//!
//! Classifies route hosts, matches them against certificate domains
//! (single-level wildcards, case-insensitive) and computes per-host
//! certificate coverage and HTTPS requirements.

pub mod coverage;
pub mod force_https;
pub mod host;
pub mod matcher;
pub mod wildcard;

pub use coverage::{suggested_domains, Certificate, CertificateCoverage, CoveredHost};
pub use force_https::{ForceHttpsDomains, HSTS_PRELOADED_TLDS};
pub use host::{is_any_host, is_dns_name, is_ip_literal, HostError, HostKind, ANY_HOST};
pub use matcher::{domain_matches, matches};
pub use wildcard::{WildcardError, WildcardPattern};
