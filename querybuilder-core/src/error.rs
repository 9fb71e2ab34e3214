//! Error types for the builder engine.

use querybuilder_types::NodeId;
use thiserror::Error;

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Hard failures of a builder operation.
///
/// Expected absences (no operators for a type, no default field, no widget)
/// are logged and degrade to a fallback instead of surfacing here.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A rule refers to a field the configuration does not declare.
    #[error("no configuration for field '{0}' could be found; add it to config.fields")]
    UnknownField(String),

    /// A node id that is not part of the current tree.
    #[error("node not found in rule tree: {0}")]
    UnknownNode(NodeId),

    /// A rule was requested but the configuration declares no fields.
    #[error("cannot add a rule: the configuration declares no fields")]
    NoFieldsConfigured,
}
