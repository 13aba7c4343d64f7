//! DNS status of route hosts
//!
//! Tracks the latest DNS answers per domain (loaded in the background
//! through a pluggable [`DnsInfoLoader`]) and evaluates whether each host
//! points at the cluster ingress.

pub mod loader;
pub mod record;
pub mod status;
pub mod store;

pub use loader::{DnsError, DnsInfoLoader, StaticLoader, SystemLoader};
pub use record::{DnsRecord, DnsTarget};
pub use status::{evaluate, DnsHint, DomainStatus};
pub use store::{DnsStatusStore, StoredRecord};
