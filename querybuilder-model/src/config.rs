use crate::{ConfigMap, EntityConfig, FieldConfig, FieldOption, FieldType};
use querybuilder_types::{Rule, RuleSet};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Replaces operator resolution for a field: `(field_key, field) -> operators`.
pub type OperatorsHook = Arc<dyn Fn(&str, &FieldConfig) -> Vec<String> + Send + Sync>;
/// Replaces input type resolution: `(field_key, operator) -> input type`.
pub type InputTypeHook = Arc<dyn Fn(&str, &str) -> Option<FieldType> + Send + Sync>;
/// Replaces option lookup: `field_key -> options`.
pub type OptionsHook = Arc<dyn Fn(&str) -> Vec<FieldOption> + Send + Sync>;
/// Replaces appending a child (rule or ruleset) to the target ruleset.
pub type AddHook = Arc<dyn Fn(&mut RuleSet) + Send + Sync>;
/// Replaces removing a rule: `(rule, parent)`. The rule is a snapshot that
/// keeps its identity.
pub type RemoveRuleHook = Arc<dyn Fn(&Rule, &mut RuleSet) + Send + Sync>;
/// Replaces removing a ruleset: `(ruleset, parent)`.
pub type RemoveRuleSetHook = Arc<dyn Fn(&RuleSet, &mut RuleSet) + Send + Sync>;
/// Replaces value coercion on operator change: `(operator, value, rule) -> value`.
pub type CoerceValueHook = Arc<dyn Fn(&str, Option<&Value>, &Rule) -> Option<Value> + Send + Sync>;
/// Replaces value carry-over on field change:
/// `(current_field, next_field, current_value) -> value`.
pub type FieldChangeValueHook = Arc<
    dyn Fn(Option<&FieldConfig>, Option<&FieldConfig>, Option<&Value>) -> Option<Value>
        + Send
        + Sync,
>;

/// Optional strategy overrides. Each unset hook falls back to the builder's
/// default algorithm.
#[derive(Clone, Default)]
pub struct ConfigHooks {
    pub get_operators: Option<OperatorsHook>,
    pub get_input_type: Option<InputTypeHook>,
    pub get_options: Option<OptionsHook>,
    pub add_rule: Option<AddHook>,
    pub remove_rule: Option<RemoveRuleHook>,
    pub add_rule_set: Option<AddHook>,
    pub remove_rule_set: Option<RemoveRuleSetHook>,
    pub coerce_value_for_operator: Option<CoerceValueHook>,
    pub calculate_field_change_value: Option<FieldChangeValueHook>,
}

impl fmt::Debug for ConfigHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigHooks")
            .field("get_operators", &self.get_operators.is_some())
            .field("get_input_type", &self.get_input_type.is_some())
            .field("get_options", &self.get_options.is_some())
            .field("add_rule", &self.add_rule.is_some())
            .field("remove_rule", &self.remove_rule.is_some())
            .field("add_rule_set", &self.add_rule_set.is_some())
            .field("remove_rule_set", &self.remove_rule_set.is_some())
            .field("coerce_value_for_operator", &self.coerce_value_for_operator.is_some())
            .field(
                "calculate_field_change_value",
                &self.calculate_field_change_value.is_some(),
            )
            .finish()
    }
}

/// The whole builder configuration.
///
/// Shared as `Arc<BuilderConfig>`; the builder treats a different `Arc` as a
/// different configuration and drops its caches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    #[serde(default)]
    pub fields: ConfigMap<FieldConfig>,
    #[serde(default)]
    pub entities: Option<ConfigMap<EntityConfig>>,
    #[serde(default)]
    pub allow_empty_rulesets: bool,
    #[serde(skip)]
    pub hooks: ConfigHooks,
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the data part of a configuration from JSON. Hooks, validators
    /// and factories are attached afterwards.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn field(&self, key: &str) -> Option<&FieldConfig> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, field: FieldConfig) -> Self {
        self.fields.insert(key, field);
        self
    }

    #[must_use]
    pub fn with_entity(mut self, key: impl Into<String>, entity: EntityConfig) -> Self {
        self.entities
            .get_or_insert_with(ConfigMap::new)
            .insert(key, entity);
        self
    }

    #[must_use]
    pub fn allow_empty_rulesets(mut self, allow: bool) -> Self {
        self.allow_empty_rulesets = allow;
        self
    }

    #[must_use]
    pub fn on_get_operators(
        mut self,
        f: impl Fn(&str, &FieldConfig) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.get_operators = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_get_input_type(
        mut self,
        f: impl Fn(&str, &str) -> Option<FieldType> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.get_input_type = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_get_options(
        mut self,
        f: impl Fn(&str) -> Vec<FieldOption> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.get_options = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_add_rule(mut self, f: impl Fn(&mut RuleSet) + Send + Sync + 'static) -> Self {
        self.hooks.add_rule = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_remove_rule(
        mut self,
        f: impl Fn(&Rule, &mut RuleSet) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.remove_rule = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_add_rule_set(mut self, f: impl Fn(&mut RuleSet) + Send + Sync + 'static) -> Self {
        self.hooks.add_rule_set = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_remove_rule_set(
        mut self,
        f: impl Fn(&RuleSet, &mut RuleSet) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.remove_rule_set = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_coerce_value_for_operator(
        mut self,
        f: impl Fn(&str, Option<&Value>, &Rule) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.hooks.coerce_value_for_operator = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn on_calculate_field_change_value(
        mut self,
        f: impl Fn(Option<&FieldConfig>, Option<&FieldConfig>, Option<&Value>) -> Option<Value>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.hooks.calculate_field_change_value = Some(Arc::new(f));
        self
    }
}
