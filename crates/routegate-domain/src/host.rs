//! Route host classification and validation

use crate::wildcard::{WildcardError, WildcardPattern};
use regex_lite::Regex;
use std::net::IpAddr;
use std::sync::OnceLock;
use thiserror::Error;

/// Host value meaning "accept traffic for every host"
pub const ANY_HOST: &str = "*";

const MAX_HOST_LEN: usize = 253;

/// Host validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Host is required")]
    Empty,

    #[error("Host is too long ({0} characters, max 253)")]
    TooLong(usize),

    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("Invalid wildcard host: {0}")]
    Wildcard(#[from] WildcardError),
}

/// A classified route host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKind {
    /// The `*` sentinel
    Any,
    /// IPv4 or IPv6 literal
    Ip(IpAddr),
    /// `*.example.com`
    Wildcard(WildcardPattern),
    /// Plain DNS name
    Name(String),
}

fn dns_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)*[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$")
            .expect("static DNS name regex")
    })
}

/// Check whether the host is the `*` sentinel
pub fn is_any_host(host: &str) -> bool {
    host == ANY_HOST
}

/// Check whether the host is an IP literal rather than a DNS name
pub fn is_ip_literal(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
}

/// Check whether a string is a syntactically valid DNS name
pub fn is_dns_name(host: &str) -> bool {
    !host.is_empty() && host.len() <= MAX_HOST_LEN && dns_name_regex().is_match(host)
}

impl HostKind {
    /// Classify and validate a host as typed into a route
    pub fn parse(host: &str) -> Result<Self, HostError> {
        if host.is_empty() {
            return Err(HostError::Empty);
        }

        if is_any_host(host) {
            return Ok(Self::Any);
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }

        if host.len() > MAX_HOST_LEN {
            return Err(HostError::TooLong(host.len()));
        }

        if host.contains('*') {
            let pattern = WildcardPattern::parse(host)?;
            if !is_dns_name(pattern.base_domain()) {
                return Err(HostError::InvalidHost(host.to_string()));
            }
            return Ok(Self::Wildcard(pattern));
        }

        if !is_dns_name(host) {
            return Err(HostError::InvalidHost(host.to_string()));
        }

        Ok(Self::Name(host.to_ascii_lowercase()))
    }

    /// Whether DNS records can be looked up for this host
    pub fn is_resolvable(&self) -> bool {
        matches!(self, Self::Name(_))
    }
}
