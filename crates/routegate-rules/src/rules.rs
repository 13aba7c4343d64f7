//! Derived-state rules for the route form
//!
//! Each edit to a route is a transition from a previous to a current form.
//! The rules inspect that transition and emit corrective field updates plus
//! side effects for the host application to execute. Every rule restores an
//! invariant and is level-triggered: it fires whenever its precondition holds,
//! so running the rules on their own output changes nothing.
//!
//! - DNS prefetch: a changed host set requests DNS status for every host.
//! - Forced HTTPS: hosts on HSTS-only domains switch https on.
//! - Redirect consistency: `httpRedirectToHttps` requires both schemes.
//! - Default destination: a route always has at least one destination row.

use crate::form::{Destination, RouteForm, Schemes};
use routegate_domain::{is_any_host, ForceHttpsDomains};
use std::collections::HashSet;
use tracing::debug;

/// Inputs the rules need besides the form itself
#[derive(Debug, Clone, Default)]
pub struct RuleContext {
    pub force_https: ForceHttpsDomains,
}

impl RuleContext {
    pub fn new(force_https: ForceHttpsDomains) -> Self {
        Self { force_https }
    }
}

/// A corrective change to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Replace the enabled schemes
    Schemes(Schemes),
    /// Replace the redirect flag
    HttpRedirectToHttps(bool),
    /// Append a destination row
    PushDestination(Destination),
}

impl FieldUpdate {
    /// Name of the form field this update writes
    pub fn field(&self) -> &'static str {
        match self {
            FieldUpdate::Schemes(_) => "schemes",
            FieldUpdate::HttpRedirectToHttps(_) => "httpRedirectToHttps",
            FieldUpdate::PushDestination(_) => "destinations",
        }
    }

    pub fn apply(&self, form: &mut RouteForm) {
        match self {
            FieldUpdate::Schemes(schemes) => form.schemes = *schemes,
            FieldUpdate::HttpRedirectToHttps(value) => form.http_redirect_to_https = *value,
            FieldUpdate::PushDestination(destination) => {
                form.destinations.push(destination.clone())
            }
        }
    }
}

/// Work the host application performs on behalf of the rules
///
/// Effects are fire-and-forget: their results never flow back into the rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Refresh the DNS status of a domain
    LoadDnsInfo(String),
}

/// Output of evaluating the rules for one transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    pub updates: Vec<FieldUpdate>,
    pub effects: Vec<Effect>,
}

impl Reaction {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.effects.is_empty()
    }

    /// Apply the field updates to a copy of `form`
    pub fn apply(&self, form: &RouteForm) -> RouteForm {
        let mut next = form.clone();
        for update in &self.updates {
            update.apply(&mut next);
        }
        next
    }
}

/// Evaluate every rule for the `previous -> current` transition
pub fn on_transition(previous: &RouteForm, current: &RouteForm, ctx: &RuleContext) -> Reaction {
    let mut reaction = Reaction::default();

    reaction.effects.extend(dns_prefetch(previous, current));
    reaction.updates.extend(forced_https(current, ctx));
    reaction.updates.extend(redirect_consistency(current));
    reaction.updates.extend(default_destination(current));

    if !reaction.is_empty() {
        debug!(
            "Route transition produced {} update(s) and {} effect(s)",
            reaction.updates.len(),
            reaction.effects.len()
        );
    }

    reaction
}

/// Evaluate the rules and return the corrected form together with its effects
pub fn reduce(
    previous: &RouteForm,
    current: &RouteForm,
    ctx: &RuleContext,
) -> (RouteForm, Vec<Effect>) {
    let reaction = on_transition(previous, current, ctx);
    let next = reaction.apply(current);
    (next, reaction.effects)
}

/// Request DNS status for every host when the host set changed
pub fn dns_prefetch(previous: &RouteForm, current: &RouteForm) -> Vec<Effect> {
    let before: HashSet<&str> = previous.hosts.iter().map(String::as_str).collect();
    let after: HashSet<&str> = current.hosts.iter().map(String::as_str).collect();

    if before == after {
        return Vec::new();
    }

    let mut requested: HashSet<&str> = HashSet::new();
    let mut effects = Vec::new();

    for host in &current.hosts {
        if !is_any_host(host) && requested.insert(host) {
            effects.push(Effect::LoadDnsInfo(host.clone()));
        }
    }

    effects
}

/// Enable https when any host belongs to a forced-HTTPS domain
pub fn forced_https(current: &RouteForm, ctx: &RuleContext) -> Option<FieldUpdate> {
    if current.schemes.https {
        return None;
    }

    let forced = ctx.force_https.includes_force_https_domain(&current.hosts);
    if forced.is_empty() {
        return None;
    }

    debug!("Hosts {:?} require https, enabling it", forced);

    let schemes = if current.schemes.http {
        Schemes::BOTH
    } else {
        Schemes::HTTPS
    };
    Some(FieldUpdate::Schemes(schemes))
}

/// Clear the redirect flag unless both http and https are enabled
pub fn redirect_consistency(current: &RouteForm) -> Option<FieldUpdate> {
    if !current.schemes.is_dual() && current.http_redirect_to_https {
        return Some(FieldUpdate::HttpRedirectToHttps(false));
    }
    None
}

/// Make sure a route has at least one destination row to fill in
pub fn default_destination(current: &RouteForm) -> Option<FieldUpdate> {
    if current.destinations.is_empty() {
        return Some(FieldUpdate::PushDestination(Destination::default()));
    }
    None
}
