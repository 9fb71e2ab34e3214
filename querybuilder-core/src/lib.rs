//! Rule-tree editing engine for the query builder.
//!
//! [`QueryBuilder`] is the per-instance state machine a renderer drives:
//! - resolution of fields, entities, operators, input types and options,
//!   with operator lists memoized per configuration
//! - default field/operator/value derivation and value coercion
//! - mutations (add/remove rule and ruleset, change condition, operator,
//!   value, field and entity), each overridable through
//!   [`ConfigHooks`](querybuilder_model::ConfigHooks)
//! - validation into an [`ErrorReport`]
//! - memoized per-rule view contexts and class-name lookup
//!
//! Expected gaps in a configuration (a type with no operators, an entity
//! with no fields) are reported as `tracing` warnings and degrade to an
//! empty fallback. The library never installs a subscriber.

mod builder;
mod class_names;
mod context;
mod defaults;
mod error;
mod options;
pub mod resolver;
mod validation;
mod widgets;

pub use builder::{CollapseToggle, QueryBuilder, COLLAPSE_TRANSITION_DELAY};
pub use class_names::{default_class_name, query_item_class_name, resolve_class_names, DEFAULT_CLASS_NAMES};
pub use context::{
    ArrowIconContext, ButtonGroupContext, EmptyWarningContext, EntityContext, FieldContext,
    InputContext, OperatorContext, RemoveButtonContext, SwitchGroupContext,
};
pub use error::{BuilderError, BuilderResult};
pub use options::{BuilderOptions, DEFAULT_EMPTY_MESSAGE};
pub use resolver::ConfigResolver;
pub use validation::{validate_tree, ErrorReport};
pub use widgets::InputWidgets;
