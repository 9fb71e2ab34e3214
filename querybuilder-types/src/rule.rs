//! Leaf predicates and the boolean combinator.

use crate::{Error, NodeId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Boolean combinator of a [`RuleSet`](crate::RuleSet).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    And,
    Or,
}

impl Condition {
    /// Returns the wire name (`"and"` / `"or"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(Error::InvalidCondition(other.to_string())),
        }
    }
}

/// A single leaf predicate: field, operator, value and optional entity.
///
/// `value` distinguishes an absent key (`None`) from an explicit JSON null
/// (`Some(Value::Null)`). The [`NodeId`] is not serialized; a deserialized
/// rule gets a fresh identity. `Clone` keeps the identity, so a clone is a
/// snapshot of the same node; [`RuleSet::reassign_duplicate_ids`]
/// separates clones that end up side by side in one tree.
///
/// [`RuleSet::reassign_duplicate_ids`]: crate::RuleSet::reassign_duplicate_ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(skip)]
    id: NodeId,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl Rule {
    /// Creates a rule on `field` with no operator, value or entity.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            field: field.into(),
            operator: None,
            value: None,
            entity: None,
        }
    }

    /// Sets the operator.
    #[must_use]
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Identity of this rule.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn renew_id(&mut self) {
        self.id = NodeId::new();
    }

    /// The operator, or `""` when unset.
    pub fn operator_str(&self) -> &str {
        self.operator.as_deref().unwrap_or_default()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.operator == other.operator
            && self.value == other.value
            && self.entity == other.entity
    }
}

/// Keeps `"value": null` as `Some(Value::Null)`; a missing key falls back to
/// the field default (`None`).
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
