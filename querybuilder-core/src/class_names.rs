//! CSS class lookup for rendered elements.

use std::collections::HashMap;

/// Built-in class table, keyed by element name.
pub const DEFAULT_CLASS_NAMES: &[(&str, &str)] = &[
    ("arrowIconButton", "q-arrow-icon-button"),
    ("arrowIcon", "q-icon q-arrow-icon"),
    ("removeIcon", "q-icon q-remove-icon"),
    ("addIcon", "q-icon q-add-icon"),
    ("button", "q-button"),
    ("buttonGroup", "q-button-group"),
    ("removeButton", "q-remove-button"),
    ("switchGroup", "q-switch-group"),
    ("switchLabel", "q-switch-label"),
    ("switchRadio", "q-switch-radio"),
    ("rightAlign", "q-right-align"),
    ("transition", "q-transition"),
    ("collapsed", "q-collapsed"),
    ("treeContainer", "q-tree-container"),
    ("tree", "q-tree"),
    ("row", "q-row"),
    ("connector", "q-connector"),
    ("rule", "q-rule"),
    ("ruleSet", "q-ruleset"),
    ("invalidRuleSet", "q-invalid-ruleset"),
    ("emptyWarning", "q-empty-warning"),
    ("fieldControl", "q-field-control"),
    ("fieldControlSize", "q-control-size"),
    ("entityControl", "q-entity-control"),
    ("entityControlSize", "q-control-size"),
    ("operatorControl", "q-operator-control"),
    ("operatorControlSize", "q-control-size"),
    ("inputControl", "q-input-control"),
    ("inputControlSize", "q-control-size"),
];

pub fn default_class_name(key: &str) -> Option<&'static str> {
    DEFAULT_CLASS_NAMES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, class)| *class)
}

/// Resolves each key against `custom`, then the built-in table, and joins
/// the non-empty results with spaces.
pub fn resolve_class_names(custom: &HashMap<String, String>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| {
            custom
                .get(*key)
                .map(String::as_str)
                .filter(|class| !class.is_empty())
                .or_else(|| default_class_name(key))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classes of one row in the tree: a rule, or a nested ruleset that may be
/// flagged invalid.
pub fn query_item_class_name(custom: &HashMap<String, String>, is_rule_set: bool, invalid: bool) -> String {
    let mut classes = resolve_class_names(custom, &["row", "connector", "transition"]);
    let kind = if is_rule_set { "ruleSet" } else { "rule" };
    classes.push(' ');
    classes.push_str(&resolve_class_names(custom, &[kind]));
    if invalid {
        classes.push(' ');
        classes.push_str(&resolve_class_names(custom, &["invalidRuleSet"]));
    }
    classes
}
