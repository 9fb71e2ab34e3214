//! Tree validation: emptiness and per-field validators.

use querybuilder_model::BuilderConfig;
use querybuilder_types::RuleSet;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Validation failures of a tree. Only the keys that fired are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorReport {
    /// The configured empty message, when some ruleset has no children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<String>,
    /// Field validator errors in depth-first tree order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Value>,
}

impl ErrorReport {
    pub fn is_empty(&self) -> bool {
        self.empty.is_none() && self.rules.is_empty()
    }

    pub fn to_json(&self) -> Value {
        // Plain data; serializing it cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Validates `tree` against `config`. `None` means the tree is valid.
pub fn validate_tree(config: &BuilderConfig, tree: &RuleSet, empty_message: &str) -> Option<ErrorReport> {
    let mut report = ErrorReport::default();

    if !config.allow_empty_rulesets && tree.is_empty_invalid() {
        report.empty = Some(empty_message.to_string());
    }

    tree.walk_rules(&mut |rule, parent| {
        if rule.field.is_empty() {
            return;
        }
        let Some(field) = config.field(&rule.field) else {
            warn!(field = %rule.field, "Rule refers to a field missing from the configuration");
            return;
        };
        if let Some(validator) = &field.validator {
            if let Err(error) = validator.validate(rule, parent) {
                report.rules.push(error);
            }
        }
    });

    (!report.is_empty()).then_some(report)
}
