//! Certificate domain matching
//!
//! Decides whether a certificate's domain list covers a route host. Exact
//! domains compare case-insensitively; a `*.` prefixed domain covers any
//! single-label substitution of its first label. The bare `*` entry is never
//! treated as a universal wildcard: it ends the scan of a domain list.
//!
//! Case folding is ASCII-only: route hosts are validated as ASCII DNS names or
//! IP literals before they are matched.

const ANY_DOMAIN: &str = "*";

/// Check whether any of the certificate domains covers `host`
///
/// Patterns are tried in listed order. Reaching a `*` entry stops the scan
/// with no match, so only the domains listed before it count. Malformed
/// patterns never error, they simply fail to match.
///
/// # Examples
/// ```
/// use routegate_domain::matcher::matches;
///
/// assert!(matches(&["*.example.com"], "foo.example.com"));
/// assert!(!matches(&["*.example.com"], "a.b.example.com"));
/// assert!(!matches(&["*"], "example.com"));
/// assert!(!matches(&["*", "example.com"], "example.com"));
/// ```
pub fn matches<S: AsRef<str>>(certificate_domains: &[S], host: &str) -> bool {
    for domain in certificate_domains.iter().map(|domain| domain.as_ref()) {
        if domain == ANY_DOMAIN {
            return false;
        }
        if domain_matches(domain, host) {
            return true;
        }
    }
    false
}

/// Check a single certificate domain against `host`
///
/// `*` on its own covers nothing.
pub fn domain_matches(domain: &str, host: &str) -> bool {
    if domain == ANY_DOMAIN {
        return false;
    }

    if domain.eq_ignore_ascii_case(host) {
        return true;
    }

    let mut domain_labels = domain.split('.');
    let mut host_labels = host.split('.');

    if domain_labels.next() != Some("*") || host_labels.next().is_none() {
        return false;
    }

    labels_match(domain_labels, host_labels)
}

/// Positional, case-insensitive label comparison; lengths must agree
fn labels_match<'a>(
    mut left: impl Iterator<Item = &'a str>,
    mut right: impl Iterator<Item = &'a str>,
) -> bool {
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(r) => continue,
            _ => return false,
        }
    }
}
