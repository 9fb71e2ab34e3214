//! Configuration schema for the query builder.
//!
//! Defines what a rule may refer to and how defaults are produced:
//! - [`FieldConfig`] / [`FieldType`]: selectable fields and their semantic type
//! - [`EntityConfig`]: optional grouping that filters the field list
//! - [`DefaultSpec`]: a literal default or a factory producing one
//! - [`RuleValidator`]: per-field validation hook
//! - [`BuilderConfig`] / [`ConfigHooks`]: the whole configuration, with
//!   optional overrides for every resolver and mutation strategy
//!
//! The data part deserializes from the same camelCase JSON the widget's
//! hosts already use; function-valued members are attached in code.

mod config;
mod config_map;
mod default;
mod entity;
mod field;
mod validator;

pub use config::{
    AddHook, BuilderConfig, CoerceValueHook, ConfigHooks, FieldChangeValueHook, InputTypeHook,
    OperatorsHook, OptionsHook, RemoveRuleHook, RemoveRuleSetHook,
};
pub use config_map::ConfigMap;
pub use default::DefaultSpec;
pub use entity::EntityConfig;
pub use field::{FieldConfig, FieldOption, FieldType};
pub use validator::RuleValidator;
