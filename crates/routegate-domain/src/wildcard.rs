//! Wildcard host pattern validation
//!
//! Route hosts may carry a single-level wildcard prefix (e.g., `*.example.com`).
//! Only the leftmost label may be a wildcard. Matching hosts against
//! certificate domains lives in [`crate::matcher`].
//!
//! # Supported patterns
//! - `*.example.com`
//! - `*.sub.example.com`
//!
//! # Unsupported patterns (will be rejected)
//! - `**.example.com` - double asterisk
//! - `api.*.example.com` - mid-level wildcard
//! - `example.*` - right-side wildcard
//! - `*` - bare asterisk (the "all hosts" sentinel is handled by [`crate::host`])

use thiserror::Error;

/// Errors that can occur while parsing a wildcard host
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WildcardError {
    #[error("Invalid wildcard pattern: {0}")]
    InvalidPattern(String),

    #[error("Empty pattern")]
    EmptyPattern,

    #[error("Double asterisk patterns (**.domain) are not supported")]
    DoubleAsterisk,

    #[error("Mid-level wildcards (api.*.domain) are not supported")]
    MidLevelWildcard,

    #[error("Right-side wildcards (domain.*) are not supported")]
    RightSideWildcard,

    #[error("Bare asterisk (*) is not a wildcard pattern")]
    BareAsterisk,

    #[error("Pattern must have at least two domain parts after the wildcard")]
    InsufficientDomainParts,
}

/// A validated wildcard host pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardPattern {
    /// The full pattern string, lowercased (e.g., "*.example.com")
    pattern: String,
    /// The base domain without the wildcard prefix (e.g., "example.com")
    base_domain: String,
}

impl WildcardPattern {
    /// Parse and validate a wildcard pattern string
    ///
    /// # Examples
    /// ```
    /// use routegate_domain::wildcard::WildcardPattern;
    ///
    /// let pattern = WildcardPattern::parse("*.Example.com").unwrap();
    /// assert_eq!(pattern.base_domain(), "example.com");
    /// assert!(WildcardPattern::parse("api.*.example.com").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, WildcardError> {
        if pattern.is_empty() {
            return Err(WildcardError::EmptyPattern);
        }

        if pattern == "*" {
            return Err(WildcardError::BareAsterisk);
        }

        if pattern.contains("**") {
            return Err(WildcardError::DoubleAsterisk);
        }

        if pattern.ends_with(".*") || (pattern.ends_with('*') && !pattern.starts_with("*.")) {
            return Err(WildcardError::RightSideWildcard);
        }

        let Some(base_domain) = pattern.strip_prefix("*.") else {
            if pattern.contains('*') {
                return Err(WildcardError::MidLevelWildcard);
            }
            return Err(WildcardError::InvalidPattern(
                "Pattern must start with *. for wildcard domains".to_string(),
            ));
        };

        if base_domain.contains('*') {
            return Err(WildcardError::MidLevelWildcard);
        }

        // "example.com", not just "com"
        if !base_domain.contains('.') {
            return Err(WildcardError::InsufficientDomainParts);
        }

        if base_domain.split('.').any(str::is_empty) {
            return Err(WildcardError::InvalidPattern(
                "Domain parts cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            pattern: pattern.to_ascii_lowercase(),
            base_domain: base_domain.to_ascii_lowercase(),
        })
    }

    /// Get the base domain without the wildcard prefix
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }
}

impl std::fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_wildcard_patterns() {
        assert!(WildcardPattern::parse("*.example.com").is_ok());
        assert!(WildcardPattern::parse("*.sub.example.com").is_ok());
        assert!(WildcardPattern::parse("*.apps.cluster.dev").is_ok());
        assert!(WildcardPattern::parse("*.a.b.c.d.example.com").is_ok());
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            WildcardPattern::parse("**.example.com"),
            Err(WildcardError::DoubleAsterisk)
        );
        assert_eq!(
            WildcardPattern::parse("api.*.example.com"),
            Err(WildcardError::MidLevelWildcard)
        );
        assert_eq!(
            WildcardPattern::parse("example.*"),
            Err(WildcardError::RightSideWildcard)
        );
        assert_eq!(
            WildcardPattern::parse("*"),
            Err(WildcardError::BareAsterisk)
        );
        assert_eq!(WildcardPattern::parse(""), Err(WildcardError::EmptyPattern));
        assert_eq!(
            WildcardPattern::parse("*.com"),
            Err(WildcardError::InsufficientDomainParts)
        );
        assert!(matches!(
            WildcardPattern::parse("*.example..com"),
            Err(WildcardError::InvalidPattern(_))
        ));
        assert!(matches!(
            WildcardPattern::parse("example.com"),
            Err(WildcardError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_pattern_display() {
        let pattern = WildcardPattern::parse("*.Example.com").unwrap();
        assert_eq!(pattern.to_string(), "*.example.com");
        assert_eq!(pattern.base_domain(), "example.com");
    }
}
