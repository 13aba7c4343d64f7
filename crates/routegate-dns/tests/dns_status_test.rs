//! DNS status for a set of route hosts
//!
//! Loads records the way the console does after a host edit: one background
//! request per host, then a read of whatever the store holds.

use routegate_dns::{
    DnsHint, DnsRecord, DnsStatusStore, DnsTarget, DomainStatus, StaticLoader,
};
use std::sync::Arc;

fn records() -> Vec<DnsRecord> {
    serde_json::from_str(
        r#"[
            {"domain": "www.example.com", "cname": "www.example.com.", "aRecords": ["203.0.113.10"]},
            {"domain": "api.example.com", "cname": "api.example.com.", "aRecords": ["198.51.100.4"]},
            {"domain": "shop.example.com", "cname": "lb.cluster.example.net"}
        ]"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_statuses_after_background_loads() {
    let store = DnsStatusStore::new(Arc::new(StaticLoader::new(records())));
    let target = DnsTarget::new("203.0.113.10");

    let hosts = [
        "www.example.com",
        "api.example.com",
        "missing.example.com",
        "203.0.113.10",
        "*",
    ];

    let handles: Vec<_> = hosts
        .iter()
        .filter_map(|host| store.request(host))
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), 2);
    assert_eq!(store.status("www.example.com", &target), DomainStatus::Configured);
    assert_eq!(
        store.status("api.example.com", &target),
        DomainStatus::Misconfigured(DnsHint::AddARecord {
            ip: "203.0.113.10".to_string()
        })
    );
    assert_eq!(store.status("missing.example.com", &target), DomainStatus::Checking);
    assert_eq!(store.status("203.0.113.10", &target), DomainStatus::Configured);
    assert_eq!(store.status("*", &target), DomainStatus::Skipped);
}

#[tokio::test]
async fn test_cname_target() {
    let store = DnsStatusStore::new(Arc::new(StaticLoader::new(records())));
    let target = DnsTarget::new("203.0.113.10").with_cname_domain("lb.cluster.example.net");

    store.request("shop.example.com").unwrap().await.unwrap();
    store.request("api.example.com").unwrap().await.unwrap();

    assert!(store.status("shop.example.com", &target).is_configured());
    assert_eq!(
        store.status("api.example.com", &target),
        DomainStatus::Misconfigured(DnsHint::AddCname {
            target: "lb.cluster.example.net".to_string(),
            current: Some("api.example.com.".to_string()),
        })
    );
}
