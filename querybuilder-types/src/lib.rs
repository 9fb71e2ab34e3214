//! Rule tree types for the query builder.
//!
//! This crate defines the predicate tree that the builder edits and emits:
//! - [`NodeId`]: identity of a tree node (UUID v7)
//! - [`Rule`]: a leaf predicate (field, operator, value, entity)
//! - [`RuleSet`] / [`RuleItem`]: the recursive AND/OR combinator
//!
//! The tree is plain data. Configuration, defaults and mutation rules live
//! in `querybuilder-model` and `querybuilder-core`.

mod ids;
mod rule;
mod ruleset;

pub use ids::NodeId;
pub use rule::{Condition, Rule};
pub use ruleset::{RuleItem, RuleSet};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing tree types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid condition: {0:?} (expected \"and\" or \"or\")")]
    InvalidCondition(String),
}
