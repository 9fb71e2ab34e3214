//! View contexts handed to the rendering layer.
//!
//! A context is a snapshot of what one control needs to render. Contexts
//! carry node ids instead of bound callbacks: the renderer calls the
//! builder's mutation methods with those ids and reads
//! [`QueryBuilder::is_disabled`](crate::QueryBuilder::is_disabled) live.
//!
//! Per-rule contexts are memoized behind `Arc` so a renderer can skip work
//! with `Arc::ptr_eq`. They stay cached until the rule is removed, its field
//! changes, or the configuration is replaced.

use querybuilder_model::{EntityConfig, FieldConfig, FieldOption};
use querybuilder_types::{Condition, NodeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Value input of a rule.
#[derive(Debug, Clone)]
pub struct InputContext {
    pub rule: NodeId,
    /// Configuration of the rule's field when the context was built.
    pub field: Option<FieldConfig>,
    pub options: Vec<FieldOption>,
}

/// Operator picker of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorContext {
    pub rule: NodeId,
    pub operators: Arc<[String]>,
}

/// Field picker of a rule.
#[derive(Debug, Clone)]
pub struct FieldContext {
    pub rule: NodeId,
    pub fields: Arc<[FieldConfig]>,
}

/// Entity picker of a rule. `entities` is empty when none are configured.
#[derive(Debug, Clone)]
pub struct EntityContext {
    pub rule: NodeId,
    pub entities: Arc<[EntityConfig]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveButtonContext {
    pub rule: NodeId,
}

/// Add rule / add ruleset / remove ruleset buttons of the root ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonGroupContext {
    pub rule_set: NodeId,
    pub allow_rule_set: bool,
}

/// AND/OR switch of a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchGroupContext {
    pub rule_set: NodeId,
    pub condition: Condition,
}

/// Collapse arrow of a ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowIconContext {
    pub rule_set: NodeId,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyWarningContext {
    pub rule_set: NodeId,
    pub message: String,
}

#[derive(Debug, Default)]
pub(crate) struct RuleContexts {
    pub input: Option<Arc<InputContext>>,
    pub operator: Option<Arc<OperatorContext>>,
    pub field: Option<Arc<FieldContext>>,
    pub entity: Option<Arc<EntityContext>>,
    pub remove_button: Option<Arc<RemoveButtonContext>>,
}

/// Identity-keyed store of memoized contexts. Entries are evicted
/// explicitly; nothing here keeps a removed rule alive.
#[derive(Debug, Default)]
pub(crate) struct ContextCache {
    rules: HashMap<NodeId, RuleContexts>,
    pub button_group: Option<Arc<ButtonGroupContext>>,
}

impl ContextCache {
    pub fn get(&self, rule: NodeId) -> Option<&RuleContexts> {
        self.rules.get(&rule)
    }

    pub fn get_mut(&mut self, rule: NodeId) -> Option<&mut RuleContexts> {
        self.rules.get_mut(&rule)
    }

    pub fn entry(&mut self, rule: NodeId) -> &mut RuleContexts {
        self.rules.entry(rule).or_default()
    }

    /// Drops every context of a removed rule.
    pub fn evict(&mut self, rule: NodeId) {
        self.rules.remove(&rule);
    }

    /// Drops the contexts that depend on a rule's field.
    pub fn evict_field_views(&mut self, rule: NodeId) {
        if let Some(contexts) = self.rules.get_mut(&rule) {
            contexts.input = None;
            contexts.operator = None;
            contexts.field = None;
            contexts.entity = None;
        }
    }

    pub fn clear(&mut self) {
        self.rules.clear();
        self.button_group = None;
    }

    pub fn contains(&self, rule: NodeId) -> bool {
        self.rules.contains_key(&rule)
    }
}
