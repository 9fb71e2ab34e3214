//! The recursive ruleset node and identity-based tree navigation.
//!
//! Nodes never store a reference to their parent. Operations that need the
//! enclosing ruleset either receive it from the caller or look it up from
//! the root with [`RuleSet::parent_of`].

use crate::{Condition, NodeId, Rule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A child of a ruleset: either a leaf rule or a nested ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleItem {
    Set(RuleSet),
    Rule(Rule),
}

impl RuleItem {
    /// Identity of the wrapped node.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Set(set) => set.id(),
            Self::Rule(rule) => rule.id(),
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Self::Rule(rule) => Some(rule),
            Self::Set(_) => None,
        }
    }

    pub fn as_rule_set(&self) -> Option<&RuleSet> {
        match self {
            Self::Set(set) => Some(set),
            Self::Rule(_) => None,
        }
    }

    pub fn is_rule_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

impl From<Rule> for RuleItem {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<RuleSet> for RuleItem {
    fn from(set: RuleSet) -> Self {
        Self::Set(set)
    }
}

/// A boolean combinator node holding an ordered list of children.
///
/// Child order is meaningful and every operation in this module preserves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(skip)]
    id: NodeId,
    #[serde(default)]
    pub condition: Condition,
    pub rules: Vec<RuleItem>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(Condition::And)
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.condition == other.condition
            && self.rules == other.rules
            && self.collapsed == other.collapsed
    }
}

impl RuleSet {
    /// Creates an empty ruleset.
    pub fn new(condition: Condition) -> Self {
        Self {
            id: NodeId::new(),
            condition,
            rules: Vec::new(),
            collapsed: false,
        }
    }

    /// Appends a child and returns `self`, for building fixtures.
    #[must_use]
    pub fn with(mut self, item: impl Into<RuleItem>) -> Self {
        self.rules.push(item.into());
        self
    }

    /// Identity of this ruleset.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parses a ruleset from JSON, assigning fresh identities.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the predicate tree to JSON (identities are not emitted).
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Finds a rule anywhere below this ruleset.
    pub fn find_rule(&self, id: NodeId) -> Option<&Rule> {
        self.rules.iter().find_map(|item| match item {
            RuleItem::Rule(rule) if rule.id() == id => Some(rule),
            RuleItem::Rule(_) => None,
            RuleItem::Set(set) => set.find_rule(id),
        })
    }

    /// Mutable variant of [`find_rule`](Self::find_rule).
    pub fn find_rule_mut(&mut self, id: NodeId) -> Option<&mut Rule> {
        self.rules.iter_mut().find_map(|item| match item {
            RuleItem::Rule(rule) if rule.id() == id => Some(rule),
            RuleItem::Rule(_) => None,
            RuleItem::Set(set) => set.find_rule_mut(id),
        })
    }

    /// Finds this ruleset or a nested one by identity.
    pub fn find_rule_set(&self, id: NodeId) -> Option<&RuleSet> {
        if self.id == id {
            return Some(self);
        }
        self.rules.iter().find_map(|item| match item {
            RuleItem::Set(set) => set.find_rule_set(id),
            RuleItem::Rule(_) => None,
        })
    }

    /// Mutable variant of [`find_rule_set`](Self::find_rule_set).
    pub fn find_rule_set_mut(&mut self, id: NodeId) -> Option<&mut RuleSet> {
        if self.id == id {
            return Some(self);
        }
        self.rules.iter_mut().find_map(|item| match item {
            RuleItem::Set(set) => set.find_rule_set_mut(id),
            RuleItem::Rule(_) => None,
        })
    }

    /// Returns the id of the ruleset whose direct children include `id`.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        if self.position_of(id).is_some() {
            return Some(self.id);
        }
        self.rules.iter().find_map(|item| match item {
            RuleItem::Set(set) => set.parent_of(id),
            RuleItem::Rule(_) => None,
        })
    }

    /// Index of a direct child.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.rules.iter().position(|item| item.id() == id)
    }

    /// Removes a direct child by identity, keeping the order of the rest.
    pub fn remove_child(&mut self, id: NodeId) -> Option<RuleItem> {
        let index = self.position_of(id)?;
        Some(self.rules.remove(index))
    }

    /// Visits every leaf rule depth-first, together with its enclosing ruleset.
    pub fn walk_rules<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Rule, &'a RuleSet),
    {
        for item in &self.rules {
            match item {
                RuleItem::Rule(rule) => visit(rule, self),
                RuleItem::Set(set) => set.walk_rules(visit),
            }
        }
    }

    /// Ids of every leaf rule below this ruleset.
    pub fn rule_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk_rules(&mut |rule, _| ids.push(rule.id()));
        ids
    }

    /// Gives a fresh identity to every node whose id already appeared
    /// earlier in a depth-first walk, so cloned nodes placed next to their
    /// source become addressable. Returns the number of nodes renewed.
    pub fn reassign_duplicate_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        self.renew_duplicates(&mut seen)
    }

    fn renew_duplicates(&mut self, seen: &mut HashSet<NodeId>) -> usize {
        let mut renewed = 0;
        if !seen.insert(self.id) {
            self.id = NodeId::new();
            seen.insert(self.id);
            renewed += 1;
        }
        for item in &mut self.rules {
            match item {
                RuleItem::Set(set) => renewed += set.renew_duplicates(seen),
                RuleItem::Rule(rule) => {
                    if !seen.insert(rule.id()) {
                        rule.renew_id();
                        seen.insert(rule.id());
                        renewed += 1;
                    }
                }
            }
        }
        renewed
    }

    /// True when this ruleset has no children, or any nested ruleset is
    /// itself empty.
    pub fn is_empty_invalid(&self) -> bool {
        self.rules.is_empty()
            || self.rules.iter().any(|item| match item {
                RuleItem::Set(set) => set.is_empty_invalid(),
                RuleItem::Rule(_) => false,
            })
    }
}
