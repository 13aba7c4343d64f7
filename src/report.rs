//! Route check report
//!
//! Collects everything the route editor shows next to the form: rule
//! corrections, field errors, the HSTS warning, certificate coverage and
//! per-host DNS status.

use routegate_domain::{Certificate, CertificateCoverage, ForceHttpsDomains};
use routegate_dns::{DnsStatusStore, DnsTarget, DomainStatus};
use routegate_rules::{host_validity, validate_route, FieldUpdate, RouteForm, ValidationErrors};
use serde::Serialize;
use std::fmt::Write;

/// A correction applied by the route rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub field: &'static str,
    pub value: String,
}

impl From<&FieldUpdate> for Correction {
    fn from(update: &FieldUpdate) -> Self {
        let value = match update {
            FieldUpdate::Schemes(schemes) => schemes.to_string(),
            FieldUpdate::HttpRedirectToHttps(value) => value.to_string(),
            FieldUpdate::PushDestination(destination) => {
                format!("{{host: {:?}, weight: {}}}", destination.host, destination.weight)
            }
        };
        Self {
            field: update.field(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDnsStatus {
    pub host: String,
    pub status: DomainStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    pub route: RouteForm,
    pub corrections: Vec<Correction>,
    pub errors: ValidationErrors,
    /// Hosts that only work over https; reported while https is enabled
    pub hsts_domains: Vec<String>,
    /// Present while https is enabled and the route has concrete hosts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<CertificateCoverage>,
    /// Present when DNS data was available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Vec<HostDnsStatus>>,
}

/// Inputs for building a report
pub struct ReportInputs<'a> {
    pub certificates: &'a [Certificate],
    pub force_https: &'a ForceHttpsDomains,
    pub dns: Option<(&'a DnsStatusStore, &'a DnsTarget)>,
}

impl RouteReport {
    pub fn build(route: RouteForm, updates: &[FieldUpdate], inputs: ReportInputs<'_>) -> Self {
        let errors = validate_route(&route);

        let (hsts_domains, certificates) = if route.schemes.https {
            (
                inputs.force_https.includes_force_https_domain(&route.hosts),
                CertificateCoverage::compute(&route.hosts, inputs.certificates),
            )
        } else {
            (Vec::new(), None)
        };

        // invalid hosts get no status
        let dns = inputs.dns.map(|(store, target)| {
            route
                .hosts
                .iter()
                .zip(host_validity(&route.hosts))
                .filter(|(_, valid)| *valid)
                .map(|(host, _)| HostDnsStatus {
                    host: host.clone(),
                    status: store.status(host, target),
                })
                .filter(|entry| entry.status != DomainStatus::Skipped)
                .collect()
        });

        Self {
            corrections: updates.iter().map(Correction::from).collect(),
            route,
            errors,
            hsts_domains,
            certificates,
            dns,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable rendering
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Hosts:   {}", self.route.hosts.join(", "));
        let _ = writeln!(out, "Schemes: {}", self.route.schemes);
        if self.route.http_redirect_to_https {
            let _ = writeln!(out, "Redirect all http requests to https with 301 status code.");
        }

        if !self.corrections.is_empty() {
            let _ = writeln!(out, "\nCorrections:");
            for correction in &self.corrections {
                let _ = writeln!(out, "  {} -> {}", correction.field, correction.value);
            }
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "\nErrors:");
            for (field, messages) in self.errors.iter() {
                for message in messages {
                    let _ = writeln!(out, "  {}: {}", field, message);
                }
            }
        }

        if !self.hsts_domains.is_empty() {
            let _ = writeln!(
                out,
                "\nThe {} domain(s) require https: browsers refuse plain http for them.",
                self.hsts_domains.join(", ")
            );
        }

        if let Some(coverage) = &self.certificates {
            let _ = writeln!(out, "\nCertificates: {}", coverage.headline());
            for host in &coverage.missing {
                let _ = writeln!(out, "  missing: {}", host);
            }
            if !coverage.missing.is_empty() {
                let _ = writeln!(
                    out,
                    "  The default TLS certificate will be used for these hosts. Create a certificate for them to avoid certificate errors."
                );
            }
            for covered in &coverage.valid {
                let _ = writeln!(
                    out,
                    "  {} will use {} certificate.",
                    covered.host, covered.certificate
                );
            }
        }

        if let Some(dns) = &self.dns {
            let _ = writeln!(out, "\nDNS:");
            for entry in dns {
                let marker = if entry.status.is_configured() { "ok" } else { "!!" };
                let _ = writeln!(out, "  [{}] {}: {}", marker, entry.host, entry.status);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegate_dns::{DnsRecord, StaticLoader};
    use routegate_rules::{Destination, Schemes};
    use std::sync::Arc;

    fn route(hosts: &[&str], schemes: Schemes) -> RouteForm {
        RouteForm {
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            schemes,
            destinations: vec![Destination {
                host: "web:80".to_string(),
                weight: 1,
            }],
            ..RouteForm::default()
        }
    }

    #[test]
    fn test_coverage_only_with_https() {
        let certs = vec![Certificate::new("c1", ["a.dev"])];
        let force_https = ForceHttpsDomains::default();
        let inputs = || ReportInputs {
            certificates: &certs,
            force_https: &force_https,
            dns: None,
        };

        let report = RouteReport::build(route(&["a.dev", "b.com"], Schemes::HTTP), &[], inputs());
        assert!(report.certificates.is_none());
        assert!(report.hsts_domains.is_empty());

        let report = RouteReport::build(route(&["a.dev", "b.com"], Schemes::BOTH), &[], inputs());
        let coverage = report.certificates.unwrap();
        assert_eq!(coverage.missing, vec!["b.com".to_string()]);
        assert_eq!(report.hsts_domains, vec!["a.dev".to_string()]);
    }

    #[test]
    fn test_dns_skips_invalid_and_any_hosts() {
        let store = DnsStatusStore::new(Arc::new(StaticLoader::default()));
        store.insert(
            DnsRecord::new("a.com")
                .with_cname("a.com.")
                .with_a_records(["10.0.0.1"]),
        );
        let target = DnsTarget::new("10.0.0.1");

        let report = RouteReport::build(
            route(&["a.com", "bad host", "*", "b.com"], Schemes::HTTP),
            &[],
            ReportInputs {
                certificates: &[],
                force_https: &ForceHttpsDomains::default(),
                dns: Some((&store, &target)),
            },
        );

        let dns = report.dns.as_ref().unwrap();
        assert_eq!(dns.len(), 2);
        assert_eq!(dns[0].status, DomainStatus::Configured);
        assert_eq!(dns[1].host, "b.com");
        assert_eq!(dns[1].status, DomainStatus::Checking);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_render_text() {
        let updates = vec![
            FieldUpdate::Schemes(Schemes::BOTH),
            FieldUpdate::HttpRedirectToHttps(false),
        ];
        let certs = vec![Certificate::new("wild", ["*.example.dev"])];
        let report = RouteReport::build(
            route(&["api.example.dev", "10.0.0.1"], Schemes::BOTH),
            &updates,
            ReportInputs {
                certificates: &certs,
                force_https: &ForceHttpsDomains::default(),
                dns: None,
            },
        );

        let text = report.render_text();
        assert!(text.contains("schemes -> {http, https}"));
        assert!(text.contains("httpRedirectToHttps -> false"));
        assert!(text.contains("1 host is missing valid SSL certificate"));
        assert!(text.contains("missing: 10.0.0.1"));
        assert!(text.contains("api.example.dev will use wild certificate."));
        assert!(text.contains("api.example.dev domain(s) require https"));
        assert!(!text.contains("DNS:"));
    }

    #[test]
    fn test_json_shape() {
        let report = RouteReport::build(
            route(&["a.com"], Schemes::HTTP),
            &[],
            ReportInputs {
                certificates: &[],
                force_https: &ForceHttpsDomains::default(),
                dns: None,
            },
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["route"]["hosts"][0], "a.com");
        assert!(json.get("certificates").is_none());
        assert!(json["hstsDomains"].as_array().unwrap().is_empty());
    }
}
