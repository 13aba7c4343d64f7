//! Latest DNS records per domain
//!
//! Lookups are requested fire-and-forget. Concurrent requests for the same
//! domain collapse into one load; readers always see the most recently
//! written record, if any.

use crate::loader::DnsInfoLoader;
use crate::record::{DnsRecord, DnsTarget};
use crate::status::{evaluate, DomainStatus};
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// A record together with the time it was loaded
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub record: DnsRecord,
    pub checked_at: DateTime<Utc>,
}

/// Shared store of DNS records, filled in the background by a loader
#[derive(Clone)]
pub struct DnsStatusStore {
    loader: Arc<dyn DnsInfoLoader>,
    records: Arc<DashMap<String, StoredRecord>>,
    in_flight: Arc<DashSet<String>>,
}

impl std::fmt::Debug for DnsStatusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsStatusStore")
            .field("records", &self.records.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

fn key(domain: &str) -> String {
    domain.to_ascii_lowercase()
}

impl DnsStatusStore {
    pub fn new(loader: Arc<dyn DnsInfoLoader>) -> Self {
        Self {
            loader,
            records: Arc::new(DashMap::new()),
            in_flight: Arc::new(DashSet::new()),
        }
    }

    /// Request a background lookup of `domain`
    ///
    /// Returns `None` when a lookup for the same domain is already running.
    /// Must be called from within a tokio runtime.
    pub fn request(&self, domain: &str) -> Option<JoinHandle<()>> {
        let key = key(domain);
        if !self.in_flight.insert(key.clone()) {
            trace!("DNS lookup for {} already in flight", domain);
            return None;
        }

        debug!("Requesting DNS info for {}", domain);

        let store = self.clone();
        let domain = domain.to_string();
        Some(tokio::spawn(async move {
            match store.loader.load(&domain).await {
                Ok(record) => store.insert(record),
                Err(e) => warn!("Failed to load DNS info for {}: {}", domain, e),
            }
            store.in_flight.remove(&key);
        }))
    }

    /// Write a record, replacing any previous one for the domain
    pub fn insert(&self, record: DnsRecord) {
        trace!("Storing DNS info for {}", record.domain);
        self.records.insert(
            key(&record.domain),
            StoredRecord {
                record,
                checked_at: Utc::now(),
            },
        );
    }

    /// Most recently written record for `domain`
    pub fn snapshot(&self, domain: &str) -> Option<StoredRecord> {
        self.records.get(&key(domain)).map(|entry| entry.value().clone())
    }

    /// When the current record for `domain` was loaded
    pub fn checked_at(&self, domain: &str) -> Option<DateTime<Utc>> {
        self.records.get(&key(domain)).map(|entry| entry.checked_at)
    }

    pub fn is_pending(&self, domain: &str) -> bool {
        self.in_flight.contains(&key(domain))
    }

    /// Evaluate `domain` against the current snapshot
    pub fn status(&self, domain: &str, target: &DnsTarget) -> DomainStatus {
        let stored = self.snapshot(domain);
        evaluate(domain, stored.as_ref().map(|s| &s.record), target)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
