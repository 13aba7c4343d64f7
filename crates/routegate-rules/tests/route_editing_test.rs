//! End-to-end tests for editing a route
//!
//! Drives the reducer through a sequence of edits the way the console does:
//! every change is a transition from the last corrected form to the edited one.

use routegate_domain::{Certificate, CertificateCoverage, ForceHttpsDomains};
use routegate_rules::{
    reduce, validate_route, Destination, Effect, RouteForm, RuleContext, Schemes,
};

struct Session {
    form: RouteForm,
    ctx: RuleContext,
    effects: Vec<Effect>,
}

impl Session {
    fn new(ctx: RuleContext) -> Self {
        let empty = RouteForm::default();
        let (form, effects) = reduce(&empty, &empty, &ctx);
        Self {
            form,
            ctx,
            effects,
        }
    }

    fn edit(&mut self, change: impl FnOnce(&mut RouteForm)) {
        let mut edited = self.form.clone();
        change(&mut edited);
        let (form, effects) = reduce(&self.form, &edited, &self.ctx);
        self.form = form;
        self.effects = effects;
    }
}

#[test]
fn test_new_route_gets_a_destination_row() {
    let session = Session::new(RuleContext::default());
    assert_eq!(session.form.destinations, vec![Destination::default()]);
    assert!(session.effects.is_empty());
}

#[test]
fn test_editing_session() {
    let mut session = Session::new(RuleContext::default());

    // adding a host triggers a DNS lookup
    session.edit(|form| form.hosts.push("www.example.com".to_string()));
    assert_eq!(
        session.effects,
        vec![Effect::LoadDnsInfo("www.example.com".to_string())]
    );
    assert_eq!(session.form.schemes, Schemes::HTTP);

    // enabling https and the redirect is kept
    session.edit(|form| {
        form.schemes = Schemes::BOTH;
        form.http_redirect_to_https = true;
    });
    assert!(session.effects.is_empty());
    assert!(session.form.http_redirect_to_https);

    // dropping https clears the redirect
    session.edit(|form| form.schemes = Schemes::HTTP);
    assert!(!session.form.http_redirect_to_https);

    // an HSTS-only host switches https back on and re-checks every host
    session.edit(|form| form.hosts.push("shop.example.dev".to_string()));
    assert_eq!(session.form.schemes, Schemes::BOTH);
    assert_eq!(
        session.effects,
        vec![
            Effect::LoadDnsInfo("www.example.com".to_string()),
            Effect::LoadDnsInfo("shop.example.dev".to_string()),
        ]
    );

    // https cannot be switched off while the host is present
    session.edit(|form| form.schemes = Schemes::HTTP);
    assert_eq!(session.form.schemes, Schemes::BOTH);
}

#[test]
fn test_https_only_when_http_disabled() {
    let mut session = Session::new(RuleContext::default());
    session.edit(|form| {
        form.schemes = Schemes::NONE;
        form.hosts = vec!["docs.example.app".to_string()];
    });
    assert_eq!(session.form.schemes, Schemes::HTTPS);
}

#[test]
fn test_custom_force_https_suffix() {
    let ctx = RuleContext::new(ForceHttpsDomains::none().with_suffix("apps.internal.io"));
    let mut session = Session::new(ctx);

    session.edit(|form| form.hosts = vec!["myapp.dev".to_string()]);
    assert_eq!(session.form.schemes, Schemes::HTTP);

    session.edit(|form| form.hosts = vec!["web.apps.internal.io".to_string()]);
    assert_eq!(session.form.schemes, Schemes::BOTH);
}

#[test]
fn test_any_host_is_not_looked_up_or_covered() {
    let mut session = Session::new(RuleContext::default());
    session.edit(|form| form.hosts = vec!["*".to_string()]);

    assert!(session.effects.is_empty());

    let certs = vec![Certificate::new("default", ["*"])];
    assert_eq!(CertificateCoverage::compute(&session.form.hosts, &certs), None);
}

#[test]
fn test_corrected_form_validates() {
    let mut session = Session::new(RuleContext::default());
    session.edit(|form| {
        form.hosts = vec!["api.example.dev".to_string(), "10.0.0.7".to_string()];
        form.schemes = Schemes::NONE;
        form.destinations[0].host = "api.default.svc.cluster.local:8080".to_string();
    });

    // https was forced on, so the schemes field is no longer empty
    assert!(validate_route(&session.form).is_empty());

    let certs = vec![Certificate::new("wild", ["*.example.dev"])];
    let coverage = CertificateCoverage::compute(&session.form.hosts, &certs).unwrap();
    assert_eq!(coverage.valid.len(), 1);
    assert_eq!(coverage.missing, vec!["10.0.0.7".to_string()]);
}
