use serde::Deserialize;
use std::collections::HashMap;

/// Message reported under `empty` when a ruleset has no rules.
pub const DEFAULT_EMPTY_MESSAGE: &str =
    "A ruleset cannot be empty. Please add a rule or remove it all together.";

/// Per-instance settings of a builder, separate from the shared
/// [`BuilderConfig`](querybuilder_model::BuilderConfig).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderOptions {
    /// Blocks every mutation.
    pub disabled: bool,
    /// Whether the renderer offers "add ruleset".
    pub allow_rule_set: bool,
    /// Whether the renderer offers collapsing rulesets.
    pub allow_collapse: bool,
    pub empty_message: String,
    /// Custom class table consulted before the default one.
    pub class_names: HashMap<String, String>,
    /// Type name to operator list. Replaces the built-in table entirely.
    pub operator_map: Option<HashMap<String, Vec<String>>>,
    /// Keep a rule's value when switching between fields of the same
    /// persistable type.
    pub persist_value_on_field_change: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            allow_rule_set: true,
            allow_collapse: false,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            class_names: HashMap::new(),
            operator_map: None,
            persist_value_on_field_change: false,
        }
    }
}

impl BuilderOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
