//! DNS info loaders
//!
//! A loader answers "what does this domain currently resolve to". The store
//! calls it in the background; callers never await a loader directly from
//! the route rules.

use crate::record::DnsRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

/// Errors that can occur while loading DNS info
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("No DNS data for domain: {0}")]
    NotFound(String),

    #[error("DNS lookup for {domain} failed: {reason}")]
    Resolve { domain: String, reason: String },

    #[error("DNS lookup for {0} timed out")]
    Timeout(String),
}

/// Source of DNS records for route hosts
///
/// # Example
/// ```ignore
/// struct ApiLoader { client: ApiClient }
///
/// #[async_trait]
/// impl DnsInfoLoader for ApiLoader {
///     async fn load(&self, domain: &str) -> Result<DnsRecord, DnsError> {
///         self.client.domain_dns_info(domain).await
///     }
/// }
/// ```
#[async_trait]
pub trait DnsInfoLoader: Send + Sync {
    /// Look up the current records for `domain`
    async fn load(&self, domain: &str) -> Result<DnsRecord, DnsError>;
}

/// Loader backed by a fixed set of records
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    records: HashMap<String, DnsRecord>,
}

impl StaticLoader {
    pub fn new(records: impl IntoIterator<Item = DnsRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.domain.to_ascii_lowercase(), record))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DnsInfoLoader for StaticLoader {
    async fn load(&self, domain: &str) -> Result<DnsRecord, DnsError> {
        self.records
            .get(&domain.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| DnsError::NotFound(domain.to_string()))
    }
}

/// Loader using the system resolver
///
/// The system resolver only exposes addresses, so the canonical name is
/// reported as the domain itself.
#[derive(Debug, Clone)]
pub struct SystemLoader {
    timeout: Duration,
}

impl SystemLoader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl DnsInfoLoader for SystemLoader {
    async fn load(&self, domain: &str) -> Result<DnsRecord, DnsError> {
        trace!("Resolving {} with the system resolver", domain);

        let lookup = tokio::net::lookup_host((domain, 0));
        let addrs = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| DnsError::Timeout(domain.to_string()))?
            .map_err(|e| DnsError::Resolve {
                domain: domain.to_string(),
                reason: e.to_string(),
            })?;

        let mut a_records: Vec<String> = Vec::new();
        for addr in addrs {
            if let IpAddr::V4(ip) = addr.ip() {
                let ip = ip.to_string();
                if !a_records.contains(&ip) {
                    a_records.push(ip);
                }
            }
        }

        Ok(DnsRecord::new(domain)
            .with_cname(domain.trim_end_matches('.'))
            .with_a_records(a_records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_loader() {
        let loader = StaticLoader::new([DnsRecord::new("A.com").with_cname("a.com.")]);
        assert_eq!(loader.len(), 1);

        let record = loader.load("a.COM").await.unwrap();
        assert_eq!(record.cname(), Some("a.com."));

        assert_eq!(
            loader.load("b.com").await,
            Err(DnsError::NotFound("b.com".to_string()))
        );
    }
}
