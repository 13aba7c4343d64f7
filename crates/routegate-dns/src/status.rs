//! DNS configuration status of a route host

use crate::record::{DnsRecord, DnsTarget};
use routegate_domain::{is_any_host, is_ip_literal};
use serde::Serialize;
use std::fmt;

/// What the operator has to change at their DNS provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fix", rename_all = "camelCase")]
pub enum DnsHint {
    /// An IP host that is not the cluster's IP
    IpMismatch { expected: String },
    /// Point an A record at the ingress
    AddARecord { ip: String },
    /// Point a CNAME at the expected target
    AddCname {
        target: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<String>,
    },
}

impl fmt::Display for DnsHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsHint::IpMismatch { expected } => {
                write!(f, "the IP address doesn't match the expected IP address {}", expected)
            }
            DnsHint::AddARecord { ip } => {
                write!(f, "please add an A record with your dns provider, point to {}", ip)
            }
            DnsHint::AddCname { target, current } => {
                if let Some(current) = current {
                    write!(f, "current CNAME record is {}, ", current)?;
                }
                write!(
                    f,
                    "please add an CNAME record with your dns provider, point to {}",
                    target
                )
            }
        }
    }
}

/// DNS status of a single host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DomainStatus {
    /// The `*` host has nothing to check
    Skipped,
    /// No usable lookup result yet
    Checking,
    /// DNS points at the cluster
    Configured,
    Misconfigured(DnsHint),
}

impl DomainStatus {
    pub fn is_configured(&self) -> bool {
        matches!(self, DomainStatus::Configured)
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Skipped => write!(f, "skipped"),
            DomainStatus::Checking => write!(f, "checking domain status"),
            DomainStatus::Configured => write!(f, "the domain is successfully configured!"),
            DomainStatus::Misconfigured(hint) => write!(f, "{}", hint),
        }
    }
}

/// Evaluate a host's DNS status from the latest known record
///
/// IP hosts are judged without DNS. A record without a CNAME counts as a lookup
/// still in progress.
pub fn evaluate(domain: &str, record: Option<&DnsRecord>, target: &DnsTarget) -> DomainStatus {
    if is_any_host(domain) {
        return DomainStatus::Skipped;
    }

    let ip = target.ip();

    if is_ip_literal(domain) {
        if domain == ip {
            return DomainStatus::Configured;
        }
        return DomainStatus::Misconfigured(DnsHint::IpMismatch {
            expected: ip.to_string(),
        });
    }

    let Some(record) = record else {
        return DomainStatus::Checking;
    };
    let Some(cname) = record.cname() else {
        return DomainStatus::Checking;
    };

    let mut is_error = !record.has_a_record(ip) && domain != ip;
    if is_error {
        if let Some(expected) = &target.cname_domain {
            is_error = expected != cname;
        }
    }

    if !is_error {
        return DomainStatus::Configured;
    }

    let hint = match &target.cname_domain {
        Some(expected) => DnsHint::AddCname {
            target: expected.clone(),
            current: Some(cname.to_string()),
        },
        None => DnsHint::AddARecord { ip: ip.to_string() },
    };
    DomainStatus::Misconfigured(hint)
}
