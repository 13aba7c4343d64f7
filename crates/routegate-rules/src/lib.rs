//! Route form model and derived-state rules
//!
//! The rules are a pure reducer over `(previous, current)` route forms: they
//! return the corrected form plus side effects (DNS lookups) for the caller
//! to execute. Validators and normalizers cover the individual fields.

pub mod form;
pub mod normalize;
pub mod rules;
pub mod validate;

pub use form::{
    add_ingress_ip, Condition, ConditionType, Destination, MethodsMode, RouteForm, Scheme,
    Schemes, HTTP_METHODS,
};
pub use normalize::{
    normalize_boolean, normalize_cpu, normalize_hosts, normalize_memory, normalize_number,
    normalize_number_or_alphabet, normalize_port, NumberOrAlphabet,
};
pub use rules::{on_transition, reduce, Effect, FieldUpdate, Reaction, RuleContext};
pub use validate::{host_validity, validate_route, ValidationError, ValidationErrors};
