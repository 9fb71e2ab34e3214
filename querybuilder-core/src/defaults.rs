//! Default field, operator and value derivation, and value coercion.
//!
//! Each entry point checks for a configuration hook first and falls back to
//! the built-in policy.

use crate::resolver::ConfigResolver;
use crate::BuilderResult;
use querybuilder_model::{EntityConfig, FieldConfig, FieldType};
use querybuilder_types::Rule;
use serde_json::Value;
use tracing::warn;

type FieldStrategy = fn(&ConfigResolver, &EntityConfig) -> Option<FieldConfig>;

/// Tried in order; the first strategy that yields a field wins.
const DEFAULT_FIELD_STRATEGIES: &[FieldStrategy] = &[explicit_default_field, first_entity_field];

fn explicit_default_field(resolver: &ConfigResolver, entity: &EntityConfig) -> Option<FieldConfig> {
    let key = entity.default_field.as_ref()?.resolve();
    match resolver.field(&key) {
        Ok(field) => Some(field),
        Err(_) => {
            warn!(entity = %entity.name, field = %key, "Entity 'defaultField' does not name a configured field");
            None
        }
    }
}

fn first_entity_field(resolver: &ConfigResolver, entity: &EntityConfig) -> Option<FieldConfig> {
    let value = entity.value.as_deref()?;
    resolver
        .fields()
        .iter()
        .find(|field| field.entity.as_deref() == Some(value))
        .cloned()
}

impl ConfigResolver {
    /// The field a rule switches to when its entity changes.
    pub fn default_field(&self, entity: &EntityConfig) -> Option<FieldConfig> {
        let found = DEFAULT_FIELD_STRATEGIES
            .iter()
            .find_map(|strategy| strategy(self, entity));
        if found.is_none() {
            warn!(
                entity = %entity.name,
                "No fields found for entity and no 'defaultField' specified. Field will default to null"
            );
        }
        found
    }

    /// The operator a rule gets when its field changes. Empty when the field
    /// resolves no operators.
    pub fn default_operator(&self, key: &str) -> BuilderResult<String> {
        let field = self.field(key)?;
        if let Some(default) = &field.default_operator {
            return Ok(default.resolve());
        }
        match self.get_operators(key)?.first() {
            Some(first) => Ok(first.clone()),
            None => {
                warn!(
                    field = %key,
                    "No operators found for field and no 'defaultOperator' specified. Operator will default to an empty string"
                );
                Ok(String::new())
            }
        }
    }

    /// Normalizes a rule's value for a newly chosen operator.
    pub fn coerce_value_for_operator(
        &self,
        operator: &str,
        value: Option<Value>,
        rule: &Rule,
    ) -> BuilderResult<Option<Value>> {
        if let Some(hook) = &self.config().hooks.coerce_value_for_operator {
            return Ok(hook(operator, value.as_ref(), rule));
        }

        let input_type = self.get_input_type(&rule.field, operator)?;
        Ok(match value {
            Some(scalar)
                if input_type == Some(FieldType::Multiselect)
                    && !scalar.is_array()
                    && is_truthy(&scalar) =>
            {
                Some(Value::Array(vec![scalar]))
            }
            other => other,
        })
    }

    /// The value a rule carries over to `next` when its field changes.
    ///
    /// `None` means the rule should have no `value` key at all.
    pub fn calculate_field_change_value(
        &self,
        current: Option<&FieldConfig>,
        next: Option<&FieldConfig>,
        value: Option<&Value>,
        persist_value: bool,
    ) -> Option<Value> {
        if let Some(hook) = &self.config().hooks.calculate_field_change_value {
            return hook(current, next, value);
        }

        if persist_value && can_keep_value(current, next) {
            return value.cloned();
        }
        next.and_then(|field| field.default_value.as_ref())
            .map(|default| default.resolve())
    }
}

fn can_keep_value(current: Option<&FieldConfig>, next: Option<&FieldConfig>) -> bool {
    let (Some(current), Some(next)) = (current, next) else {
        return false;
    };
    match (&current.field_type, &next.field_type) {
        (Some(a), Some(b)) => a == b && a.is_persistable(),
        _ => false,
    }
}

/// Loose truthiness: `null`, `false`, zero, NaN and `""` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
