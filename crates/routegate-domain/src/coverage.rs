//! Certificate coverage for route hosts
//!
//! Partitions a route's hosts into those served by an uploaded or issued
//! certificate and those that will fall back to the default TLS certificate.

use crate::host::is_any_host;
use crate::matcher::matches;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// A certificate known to the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl Certificate {
    pub fn new(name: impl Into<String>, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether this certificate covers `host`
    pub fn covers(&self, host: &str) -> bool {
        matches(&self.domains, host)
    }
}

/// A host together with the certificate that will serve it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveredHost {
    pub host: String,
    pub certificate: String,
}

/// Result of matching route hosts against the certificate list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateCoverage {
    /// Hosts with a matching certificate, in host order
    pub valid: Vec<CoveredHost>,
    /// Hosts without any matching certificate, in host order
    pub missing: Vec<String>,
}

impl CertificateCoverage {
    /// Compute coverage for the given hosts
    ///
    /// The `*` host is skipped. Returns `None` when there is nothing to report.
    /// Each host is served by the first certificate, in list order, that covers it.
    pub fn compute<S: AsRef<str>>(hosts: &[S], certificates: &[Certificate]) -> Option<Self> {
        let mut coverage = Self::default();

        for host in hosts.iter().map(AsRef::as_ref) {
            if is_any_host(host) {
                continue;
            }

            match certificates.iter().find(|cert| cert.covers(host)) {
                Some(cert) => {
                    trace!("Host {} is covered by certificate {}", host, cert.name);
                    coverage.valid.push(CoveredHost {
                        host: host.to_string(),
                        certificate: cert.name.clone(),
                    });
                }
                None => {
                    trace!("No certificate covers host {}", host);
                    coverage.missing.push(host.to_string());
                }
            }
        }

        if coverage.valid.is_empty() && coverage.missing.is_empty() {
            return None;
        }

        Some(coverage)
    }

    /// All hosts have a certificate
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// One-line summary of the coverage state
    pub fn headline(&self) -> String {
        match self.missing.len() {
            0 => "All hosts have valid SSL certifications signed by a certificate authority."
                .to_string(),
            1 => "1 host is missing valid SSL certificate signed by a certificate authority."
                .to_string(),
            n => format!(
                "{} hosts are missing valid SSL certificate signed by a certificate authority.",
                n
            ),
        }
    }
}

/// Domains offered as host suggestions, excluding the `*` entry
///
/// Keeps the first occurrence of each domain in certificate order.
pub fn suggested_domains(certificates: &[Certificate]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut domains = Vec::new();

    for domain in certificates.iter().flat_map(|cert| &cert.domains) {
        if domain != "*" && seen.insert(domain) {
            domains.push(domain.clone());
        }
    }

    domains
}
