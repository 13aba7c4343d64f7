//! Route form validators
//!
//! Field validators run before the derived-state rules; the rules assume
//! their input already passed these checks.

use crate::form::{Destination, MethodsMode, RouteForm, Schemes, HTTP_METHODS};
use routegate_domain::{HostError, HostKind};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// A single field validation failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required")]
    Required,

    #[error("Select at least one option")]
    EmptyList,

    #[error("Host #{index} ({host}): {source}")]
    InvalidHost {
        index: usize,
        host: String,
        #[source]
        source: HostError,
    },

    #[error("Path #{index} ({path}) must start with /")]
    InvalidPath { index: usize, path: String },

    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    #[error("Destination #{0} requires a host")]
    DestinationHostRequired(usize),

    #[error("At least one destination must have a weight greater than 0")]
    ZeroTotalWeight,
}

/// Validation failures keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.fields.entry(field).or_default().push(error.to_string());
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields.iter().map(|(field, errors)| (*field, errors.as_slice()))
    }

    fn collect(&mut self, field: &'static str, result: Result<(), Vec<ValidationError>>) {
        if let Err(errors) = result {
            for error in errors {
                self.add(field, error);
            }
        }
    }
}

/// Hosts are required and each one must be `*`, an IP, or a (wildcard) DNS name
pub fn validate_hosts<S: AsRef<str>>(hosts: &[S]) -> Result<(), Vec<ValidationError>> {
    if hosts.is_empty() {
        return Err(vec![ValidationError::Required]);
    }

    let errors: Vec<ValidationError> = hosts
        .iter()
        .enumerate()
        .filter_map(|(index, host)| {
            HostKind::parse(host.as_ref())
                .err()
                .map(|source| ValidationError::InvalidHost {
                    index,
                    host: host.as_ref().to_string(),
                    source,
                })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Per-host validity, in host order
///
/// Invalid hosts get no DNS status indicator.
pub fn host_validity<S: AsRef<str>>(hosts: &[S]) -> Vec<bool> {
    hosts
        .iter()
        .map(|host| HostKind::parse(host.as_ref()).is_ok())
        .collect()
}

/// Path prefixes are required and must be absolute
pub fn validate_paths<S: AsRef<str>>(paths: &[S]) -> Result<(), Vec<ValidationError>> {
    if paths.is_empty() {
        return Err(vec![ValidationError::Required]);
    }

    let errors: Vec<ValidationError> = paths
        .iter()
        .enumerate()
        .filter(|(_, path)| !path.as_ref().starts_with('/'))
        .map(|(index, path)| ValidationError::InvalidPath {
            index,
            path: path.as_ref().to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_schemes(schemes: &Schemes) -> Result<(), Vec<ValidationError>> {
    if schemes.is_empty() {
        return Err(vec![ValidationError::EmptyList]);
    }
    Ok(())
}

/// Methods only matter when the route restricts them
pub fn validate_methods<S: AsRef<str>>(
    mode: MethodsMode,
    methods: &[S],
) -> Result<(), Vec<ValidationError>> {
    if mode == MethodsMode::All {
        return Ok(());
    }

    if methods.is_empty() {
        return Err(vec![ValidationError::EmptyList]);
    }

    let errors: Vec<ValidationError> = methods
        .iter()
        .map(AsRef::as_ref)
        .filter(|method| !HTTP_METHODS.contains(method))
        .map(|method| ValidationError::UnknownMethod(method.to_string()))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_destinations(destinations: &[Destination]) -> Result<(), Vec<ValidationError>> {
    if destinations.is_empty() {
        return Err(vec![ValidationError::Required]);
    }

    let mut errors: Vec<ValidationError> = destinations
        .iter()
        .enumerate()
        .filter(|(_, destination)| destination.host.trim().is_empty())
        .map(|(index, _)| ValidationError::DestinationHostRequired(index))
        .collect();

    if destinations.iter().all(|destination| destination.weight == 0) {
        errors.push(ValidationError::ZeroTotalWeight);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Run every field validator and collect the failures
pub fn validate_route(form: &RouteForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    errors.collect("hosts", validate_hosts(&form.hosts));
    errors.collect("paths", validate_paths(&form.paths));
    errors.collect("schemes", validate_schemes(&form.schemes));
    errors.collect("methods", validate_methods(form.methods_mode, &form.methods));
    errors.collect("destinations", validate_destinations(&form.destinations));

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RouteForm {
        RouteForm {
            hosts: vec!["www.example.com".to_string(), "*.example.com".to_string()],
            destinations: vec![Destination {
                host: "web.default.svc.cluster.local:80".to_string(),
                weight: 1,
            }],
            ..RouteForm::default()
        }
    }

    #[test]
    fn test_valid_route() {
        assert!(validate_route(&valid_form()).is_empty());
    }

    #[test]
    fn test_hosts() {
        let none: [&str; 0] = [];
        assert_eq!(validate_hosts(&none), Err(vec![ValidationError::Required]));
        assert!(validate_hosts(&["*", "10.0.0.1", "*.example.com", "a.b.c"]).is_ok());

        let errors = validate_hosts(&["ok.com", "bad host", "x.*.com"]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::InvalidHost { index: 1, .. }));
        assert!(matches!(errors[1], ValidationError::InvalidHost { index: 2, .. }));
    }

    #[test]
    fn test_host_validity() {
        assert_eq!(
            host_validity(&["ok.com", "bad host", "*"]),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_paths() {
        assert!(validate_paths(&["/", "/api"]).is_ok());
        assert_eq!(
            validate_paths(&["/ok", "api"]),
            Err(vec![ValidationError::InvalidPath {
                index: 1,
                path: "api".to_string()
            }])
        );
    }

    #[test]
    fn test_methods_only_checked_when_specific() {
        let none: [&str; 0] = [];
        assert!(validate_methods(MethodsMode::All, &none).is_ok());
        assert_eq!(
            validate_methods(MethodsMode::Specific, &none),
            Err(vec![ValidationError::EmptyList])
        );
        assert!(validate_methods(MethodsMode::Specific, &["GET", "POST"]).is_ok());
        assert_eq!(
            validate_methods(MethodsMode::Specific, &["FETCH"]),
            Err(vec![ValidationError::UnknownMethod("FETCH".to_string())])
        );
    }

    #[test]
    fn test_destinations() {
        assert_eq!(
            validate_destinations(&[]),
            Err(vec![ValidationError::Required])
        );

        let errors = validate_destinations(&[Destination {
            host: " ".to_string(),
            weight: 0,
        }])
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DestinationHostRequired(0),
                ValidationError::ZeroTotalWeight
            ]
        );
    }

    #[test]
    fn test_collects_per_field() {
        let mut form = valid_form();
        form.hosts.clear();
        form.schemes = Schemes::NONE;

        let errors = validate_route(&form);
        assert_eq!(errors.field("hosts"), Some(&["Required".to_string()][..]));
        assert_eq!(
            errors.field("schemes"),
            Some(&["Select at least one option".to_string()][..])
        );
        assert_eq!(errors.field("paths"), None);
        assert_eq!(errors.iter().count(), 2);
    }
}
