//! Derives fields, entities, operators, input types and options from a
//! [`BuilderConfig`].
//!
//! The resolver is rebuilt whenever the builder receives a different
//! configuration `Arc`, which is what clears the operator cache.

use crate::{BuilderError, BuilderResult};
use querybuilder_model::{BuilderConfig, EntityConfig, FieldConfig, FieldOption, FieldType};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

pub const IS_NULL: &str = "is null";
pub const IS_NOT_NULL: &str = "is not null";
pub const IN: &str = "in";
pub const NOT_IN: &str = "not in";

/// Operators for a type when no caller-supplied operator map is set.
pub fn default_operators(field_type: &FieldType) -> &'static [&'static str] {
    match field_type {
        FieldType::String => &["=", "!=", "contains", "like"],
        FieldType::Number | FieldType::Time | FieldType::Date => &["=", "!=", ">", ">=", "<", "<="],
        FieldType::Category => &["=", "!=", IN, NOT_IN],
        FieldType::Boolean => &["="],
        _ => &[],
    }
}

/// The map key stands in for a missing or empty `value`.
fn fill_value(value: &mut Option<String>, key: &str) {
    if value.as_deref().is_none_or(str::is_empty) {
        *value = Some(key.to_string());
    }
}

pub struct ConfigResolver {
    config: Arc<BuilderConfig>,
    operator_map: Option<HashMap<String, Vec<String>>>,
    fields: Arc<[FieldConfig]>,
    entities: Option<Arc<[EntityConfig]>>,
    operators_cache: RefCell<HashMap<String, Arc<[String]>>>,
}

impl ConfigResolver {
    pub fn new(
        config: Arc<BuilderConfig>,
        operator_map: Option<HashMap<String, Vec<String>>>,
    ) -> Self {
        let fields = config
            .fields
            .iter()
            .map(|(key, field)| {
                let mut field = field.clone();
                fill_value(&mut field.value, key);
                field
            })
            .collect();
        let entities = config.entities.as_ref().map(|entities| {
            entities
                .iter()
                .map(|(key, entity)| {
                    let mut entity = entity.clone();
                    fill_value(&mut entity.value, key);
                    entity
                })
                .collect()
        });

        Self {
            config,
            operator_map,
            fields,
            entities,
            operators_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Arc<BuilderConfig> {
        &self.config
    }

    /// All fields in declaration order, `value` filled in.
    pub fn fields(&self) -> &Arc<[FieldConfig]> {
        &self.fields
    }

    /// All entities in declaration order, or `None` when none are configured.
    pub fn entities(&self) -> Option<&Arc<[EntityConfig]>> {
        self.entities.as_ref()
    }

    /// Fields of one entity. Without entities or without a filter, every field.
    pub fn get_fields(&self, entity: Option<&str>) -> Vec<FieldConfig> {
        match (self.entities.is_some(), entity) {
            (true, Some(entity)) => self
                .fields
                .iter()
                .filter(|field| field.entity.as_deref() == Some(entity))
                .cloned()
                .collect(),
            _ => self.fields.to_vec(),
        }
    }

    /// The field registered under `key`, with `value` filled in.
    pub fn field(&self, key: &str) -> BuilderResult<FieldConfig> {
        let mut field = self
            .config
            .field(key)
            .cloned()
            .ok_or_else(|| BuilderError::UnknownField(key.to_string()))?;
        fill_value(&mut field.value, key);
        Ok(field)
    }

    /// The entity whose `value` is `value`.
    pub fn entity(&self, value: &str) -> Option<&EntityConfig> {
        self.entities
            .as_deref()?
            .iter()
            .find(|entity| entity.value.as_deref() == Some(value))
    }

    /// Operators offered for a field, memoized per field key.
    ///
    /// An override hook replaces the whole pipeline and is not cached.
    pub fn get_operators(&self, key: &str) -> BuilderResult<Arc<[String]>> {
        if let Some(cached) = self.operators_cache.borrow().get(key) {
            return Ok(Arc::clone(cached));
        }

        let field = self
            .config
            .field(key)
            .ok_or_else(|| BuilderError::UnknownField(key.to_string()))?;

        if let Some(hook) = &self.config.hooks.get_operators {
            return Ok(hook(key, field).into());
        }

        let mut operators = match (&field.operators, &field.field_type) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(field_type)) => {
                let operators = self.operators_for_type(field_type);
                if operators.is_empty() {
                    warn!(
                        field = %key,
                        field_type = %field_type,
                        "No operators found for field. Define 'operators' on the field or supply an operator map"
                    );
                }
                operators
            }
            (None, None) => {
                warn!(field = %key, "No 'type' property found on field");
                Vec::new()
            }
        };
        if field.nullable {
            operators.extend([IS_NULL.to_string(), IS_NOT_NULL.to_string()]);
        }

        let operators: Arc<[String]> = operators.into();
        self.operators_cache
            .borrow_mut()
            .insert(key.to_string(), Arc::clone(&operators));
        Ok(operators)
    }

    fn operators_for_type(&self, field_type: &FieldType) -> Vec<String> {
        match &self.operator_map {
            Some(map) => map.get(field_type.as_str()).cloned().unwrap_or_default(),
            None => default_operators(field_type)
                .iter()
                .map(|op| op.to_string())
                .collect(),
        }
    }

    /// The value widget for a field/operator pair. `None` means no widget
    /// (the null-check operators).
    pub fn get_input_type(&self, key: &str, operator: &str) -> BuilderResult<Option<FieldType>> {
        if let Some(hook) = &self.config.hooks.get_input_type {
            return Ok(hook(key, operator));
        }

        let field = self
            .config
            .field(key)
            .ok_or_else(|| BuilderError::UnknownField(key.to_string()))?;
        let field_type = field.field_type.clone();

        Ok(match operator {
            IS_NULL | IS_NOT_NULL => None,
            IN | NOT_IN => match field_type {
                Some(FieldType::Category | FieldType::Boolean) => Some(FieldType::Multiselect),
                other => other,
            },
            _ => field_type,
        })
    }

    pub fn get_options(&self, key: &str) -> BuilderResult<Vec<FieldOption>> {
        if let Some(hook) = &self.config.hooks.get_options {
            return Ok(hook(key));
        }

        let field = self
            .config
            .field(key)
            .ok_or_else(|| BuilderError::UnknownField(key.to_string()))?;
        Ok(field.options.clone().unwrap_or_default())
    }

    #[cfg(test)]
    pub(crate) fn cached_operator_keys(&self) -> usize {
        self.operators_cache.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(config: BuilderConfig) -> ConfigResolver {
        ConfigResolver::new(Arc::new(config), None)
    }

    #[test]
    fn hook_results_are_not_cached() {
        let r = resolver(
            BuilderConfig::new()
                .with_field("age", FieldConfig::number("Age"))
                .on_get_operators(|_, _| vec!["~".into()]),
        );
        assert_eq!(&*r.get_operators("age").unwrap(), &["~".to_string()]);
        assert_eq!(r.cached_operator_keys(), 0);
    }

    #[test]
    fn default_pipeline_results_are_cached() {
        let r = resolver(BuilderConfig::new().with_field("age", FieldConfig::number("Age")));
        r.get_operators("age").unwrap();
        r.get_operators("age").unwrap();
        assert_eq!(r.cached_operator_keys(), 1);
    }

    #[test]
    fn unknown_field_is_not_cached() {
        let r = resolver(BuilderConfig::new());
        assert!(r.get_operators("ghost").is_err());
        assert_eq!(r.cached_operator_keys(), 0);
    }
}
