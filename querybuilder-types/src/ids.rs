//! Node identifiers for the rule tree.
//!
//! Rules and rulesets have no natural key: two nodes may hold identical
//! values and still be different nodes. Each node therefore gets a UUID v7
//! at creation, and every identity-based operation goes through it.

use std::fmt;
use uuid::Uuid;

/// Identity of a [`Rule`](crate::Rule) or [`RuleSet`](crate::RuleSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a fresh node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
