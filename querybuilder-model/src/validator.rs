use querybuilder_types::{Rule, RuleSet};
use serde_json::Value;

/// Per-field validation attached to a [`FieldConfig`](crate::FieldConfig).
///
/// Called for every rule on the field, with the ruleset that directly
/// encloses it. Return `Err(payload)` to report an error; the payload is
/// collected verbatim into the builder's error report.
///
/// Plain closures with the matching signature implement this trait.
pub trait RuleValidator: Send + Sync {
    fn validate(&self, rule: &Rule, parent: &RuleSet) -> Result<(), Value>;
}

impl<F> RuleValidator for F
where
    F: Fn(&Rule, &RuleSet) -> Result<(), Value> + Send + Sync,
{
    fn validate(&self, rule: &Rule, parent: &RuleSet) -> Result<(), Value> {
        self(rule, parent)
    }
}
