//! Editable route model
//!
//! Mirrors the fields an operator edits when creating or updating an HTTP
//! route. Serialized with camelCase keys so route files look like the
//! API objects they describe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods a route can be restricted to
pub const HTTP_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "TRACE", "CONNECT",
];

/// Traffic scheme accepted by a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Set of enabled schemes
///
/// Serialized as a list, e.g. `["http", "https"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Scheme>", into = "Vec<Scheme>")]
pub struct Schemes {
    pub http: bool,
    pub https: bool,
}

impl Schemes {
    pub const NONE: Schemes = Schemes {
        http: false,
        https: false,
    };
    pub const HTTP: Schemes = Schemes {
        http: true,
        https: false,
    };
    pub const HTTPS: Schemes = Schemes {
        http: false,
        https: true,
    };
    pub const BOTH: Schemes = Schemes {
        http: true,
        https: true,
    };

    pub fn contains(&self, scheme: Scheme) -> bool {
        match scheme {
            Scheme::Http => self.http,
            Scheme::Https => self.https,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.http && !self.https
    }

    /// Both http and https are enabled
    pub fn is_dual(&self) -> bool {
        self.http && self.https
    }

    pub fn to_vec(self) -> Vec<Scheme> {
        self.into()
    }
}

impl From<Vec<Scheme>> for Schemes {
    fn from(list: Vec<Scheme>) -> Self {
        Self {
            http: list.contains(&Scheme::Http),
            https: list.contains(&Scheme::Https),
        }
    }
}

impl From<Schemes> for Vec<Scheme> {
    fn from(schemes: Schemes) -> Self {
        let mut list = Vec::with_capacity(2);
        if schemes.http {
            list.push(Scheme::Http);
        }
        if schemes.https {
            list.push(Scheme::Https);
        }
        list
    }
}

impl fmt::Display for Schemes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.to_vec().iter().map(Scheme::to_string).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Whether a route accepts every method or a chosen subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodsMode {
    #[default]
    All,
    Specific,
}

/// Backend that receives a share of the route's traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub host: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            host: String::new(),
            weight: default_weight(),
        }
    }
}

/// Where a match condition looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Header,
    Query,
}

/// Request condition a route can require
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionType,
    #[serde(default = "default_operator")]
    pub operator: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

fn default_operator() -> String {
    "equal".to_string()
}

/// Editable route state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteForm {
    pub hosts: Vec<String>,
    pub paths: Vec<String>,
    pub schemes: Schemes,
    pub http_redirect_to_https: bool,
    pub strip_path: bool,
    pub methods_mode: MethodsMode,
    pub methods: Vec<String>,
    pub destinations: Vec<Destination>,
    pub conditions: Vec<Condition>,
}

impl Default for RouteForm {
    /// The state of a freshly opened "new route" form
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            paths: vec!["/".to_string()],
            schemes: Schemes::HTTP,
            http_redirect_to_https: false,
            strip_path: true,
            methods_mode: MethodsMode::All,
            methods: HTTP_METHODS.iter().map(|m| m.to_string()).collect(),
            destinations: Vec::new(),
            conditions: Vec::new(),
        }
    }
}

/// Append the cluster ingress IP to the host list unless it is already present
pub fn add_ingress_ip(hosts: &mut Vec<String>, ingress_ip: &str) -> bool {
    if ingress_ip.is_empty() || hosts.iter().any(|host| host == ingress_ip) {
        return false;
    }

    hosts.push(ingress_ip.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemes_serde_as_list() {
        let json = serde_json::to_string(&Schemes::BOTH).unwrap();
        assert_eq!(json, r#"["http","https"]"#);

        let schemes: Schemes = serde_json::from_str(r#"["https"]"#).unwrap();
        assert_eq!(schemes, Schemes::HTTPS);

        let schemes: Schemes = serde_json::from_str("[]").unwrap();
        assert!(schemes.is_empty());
    }

    #[test]
    fn test_schemes_display() {
        assert_eq!(Schemes::BOTH.to_string(), "{http, https}");
        assert_eq!(Schemes::NONE.to_string(), "{}");
    }

    #[test]
    fn test_route_form_from_yaml() {
        let yaml = r#"
hosts:
  - www.example.com
  - api.example.dev
schemes: [http]
httpRedirectToHttps: true
destinations:
  - host: web.default.svc.cluster.local:80
conditions:
  - type: header
    name: x-canary
    value: "true"
"#;
        let form: RouteForm = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(form.hosts.len(), 2);
        assert_eq!(form.schemes, Schemes::HTTP);
        assert!(form.http_redirect_to_https);
        assert_eq!(form.destinations[0].weight, 1);
        assert_eq!(form.conditions[0].kind, ConditionType::Header);
        assert_eq!(form.conditions[0].operator, "equal");
        // unspecified fields fall back to the new-route defaults
        assert_eq!(form.paths, vec!["/".to_string()]);
        assert_eq!(form.methods_mode, MethodsMode::All);
    }

    #[test]
    fn test_add_ingress_ip() {
        let mut hosts = vec!["example.com".to_string()];
        assert!(add_ingress_ip(&mut hosts, "10.0.0.1"));
        assert!(!add_ingress_ip(&mut hosts, "10.0.0.1"));
        assert!(!add_ingress_ip(&mut hosts, ""));
        assert_eq!(hosts, vec!["example.com".to_string(), "10.0.0.1".to_string()]);
    }
}
