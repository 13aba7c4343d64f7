//! DNS record data as reported for a route host

use serde::{Deserialize, Serialize};

/// Latest known DNS answers for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub domain: String,
    /// Canonical name the domain resolves through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    /// IPv4 addresses of the domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_records: Option<Vec<String>>,
}

impl DnsRecord {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            cname: None,
            a_records: None,
        }
    }

    pub fn with_cname(mut self, cname: impl Into<String>) -> Self {
        self.cname = Some(cname.into());
        self
    }

    pub fn with_a_records(mut self, records: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.a_records = Some(records.into_iter().map(Into::into).collect());
        self
    }

    /// The CNAME, if the lookup produced a non-empty one
    pub fn cname(&self) -> Option<&str> {
        self.cname.as_deref().filter(|cname| !cname.is_empty())
    }

    pub fn has_a_record(&self, ip: &str) -> bool {
        self.a_records
            .as_ref()
            .map(|records| records.iter().any(|record| record == ip))
            .unwrap_or(false)
    }
}

/// Where a host's DNS is expected to point
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsTarget {
    /// Cluster ingress IP
    pub ingress_ip: String,
    /// Overrides the ingress IP when set
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Expected CNAME target; when set, a matching CNAME is sufficient
    #[serde(default)]
    pub cname_domain: Option<String>,
}

impl DnsTarget {
    pub fn new(ingress_ip: impl Into<String>) -> Self {
        Self {
            ingress_ip: ingress_ip.into(),
            ip_address: None,
            cname_domain: None,
        }
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_cname_domain(mut self, cname: impl Into<String>) -> Self {
        self.cname_domain = Some(cname.into());
        self
    }

    /// IP the domain's A record should contain
    pub fn ip(&self) -> &str {
        self.ip_address.as_deref().unwrap_or(&self.ingress_ip)
    }
}
