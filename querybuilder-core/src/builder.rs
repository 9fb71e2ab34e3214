//! The per-instance query builder engine.
//!
//! A [`QueryBuilder`] owns the rule tree it edits, a resolver over the
//! current configuration, and the memoized view contexts. Renderers read
//! the tree and contexts, and call the mutation methods with node ids on
//! user gestures. Every applied mutation fires touched, then change.

use crate::class_names::{query_item_class_name, resolve_class_names};
use crate::context::{
    ArrowIconContext, ButtonGroupContext, ContextCache, EmptyWarningContext, EntityContext,
    FieldContext, InputContext, OperatorContext, RemoveButtonContext, RuleContexts,
    SwitchGroupContext,
};
use crate::resolver::ConfigResolver;
use crate::validation::{validate_tree, ErrorReport};
use crate::widgets::InputWidgets;
use crate::{BuilderError, BuilderOptions, BuilderResult};
use querybuilder_model::{BuilderConfig, EntityConfig, FieldConfig, FieldOption, FieldType};
use querybuilder_types::{Condition, NodeId, Rule, RuleItem, RuleSet};
use serde_json::Value;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Delay between starting the collapse transition and flipping `collapsed`.
pub const COLLAPSE_TRANSITION_DELAY: Duration = Duration::from_millis(100);

/// A pending collapse flip, returned by [`QueryBuilder::toggle_collapse`].
///
/// The host starts its transition, waits `delay`, then hands the toggle to
/// [`QueryBuilder::apply_collapse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseToggle {
    pub rule_set: NodeId,
    pub delay: Duration,
}

type ChangeCallback = Box<dyn FnMut(&RuleSet) + Send>;
type NotifyCallback = Box<dyn FnMut() + Send>;

pub struct QueryBuilder {
    data: RuleSet,
    resolver: ConfigResolver,
    options: BuilderOptions,
    contexts: RefCell<ContextCache>,
    disabled_by_host: bool,
    on_change: Option<ChangeCallback>,
    on_touched: Option<NotifyCallback>,
    parent_touched: Option<NotifyCallback>,
    parent_change: Option<NotifyCallback>,
}

impl QueryBuilder {
    pub fn new(config: Arc<BuilderConfig>) -> Self {
        Self::with_options(config, BuilderOptions::default())
    }

    pub fn with_options(config: Arc<BuilderConfig>, options: BuilderOptions) -> Self {
        Self {
            data: RuleSet::default(),
            resolver: ConfigResolver::new(config, options.operator_map.clone()),
            options,
            contexts: RefCell::new(ContextCache::default()),
            disabled_by_host: false,
            on_change: None,
            on_touched: None,
            parent_touched: None,
            parent_change: None,
        }
    }

    pub fn config(&self) -> &Arc<BuilderConfig> {
        self.resolver.config()
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Installs a configuration. Passing the `Arc` already in use is a
    /// no-op; any other `Arc` drops the operator cache and every context.
    pub fn set_config(&mut self, config: Arc<BuilderConfig>) {
        if Arc::ptr_eq(self.resolver.config(), &config) {
            return;
        }
        self.resolver = ConfigResolver::new(config, self.options.operator_map.clone());
        self.contexts.get_mut().clear();
        debug!("Configuration replaced; caches cleared");
    }

    pub fn set_options(&mut self, options: BuilderOptions) {
        if options.operator_map != self.options.operator_map {
            self.resolver =
                ConfigResolver::new(Arc::clone(self.resolver.config()), options.operator_map.clone());
        }
        self.options = options;
        self.contexts.get_mut().clear();
    }

    // ================================================================
    // Host form contract
    // ================================================================

    pub fn read(&self) -> &RuleSet {
        &self.data
    }

    /// Replaces the tree without notifying. `None` installs an empty
    /// `and` ruleset. Nodes sharing an id get fresh ids.
    pub fn write(&mut self, value: Option<RuleSet>) {
        self.data = value.unwrap_or_default();
        self.renew_duplicate_ids();
        self.contexts.get_mut().clear();
    }

    /// Replaces the tree and fires the change callbacks.
    pub fn set_value(&mut self, value: Option<RuleSet>) {
        self.write(value);
        self.handle_change();
    }

    pub fn on_change(&mut self, callback: impl FnMut(&RuleSet) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn on_touched(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_touched = Some(Box::new(callback));
    }

    /// Callbacks of an enclosing builder, fired after this instance's own.
    pub fn set_parent_callbacks(
        &mut self,
        touched: impl FnMut() + Send + 'static,
        change: impl FnMut() + Send + 'static,
    ) {
        self.parent_touched = Some(Box::new(touched));
        self.parent_change = Some(Box::new(change));
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled_by_host = disabled;
    }

    pub fn is_disabled(&self) -> bool {
        self.options.disabled || self.disabled_by_host
    }

    /// Validates the current tree. `None` means valid.
    pub fn validate(&self) -> Option<ErrorReport> {
        validate_tree(self.resolver.config(), &self.data, &self.options.empty_message)
    }

    // ================================================================
    // Resolution
    // ================================================================

    pub fn fields(&self) -> &Arc<[FieldConfig]> {
        self.resolver.fields()
    }

    pub fn entities(&self) -> Option<&Arc<[EntityConfig]>> {
        self.resolver.entities()
    }

    pub fn get_fields(&self, entity: Option<&str>) -> Vec<FieldConfig> {
        self.resolver.get_fields(entity)
    }

    pub fn get_operators(&self, field: &str) -> BuilderResult<Arc<[String]>> {
        self.resolver.get_operators(field)
    }

    pub fn get_input_type(&self, field: &str, operator: &str) -> BuilderResult<Option<FieldType>> {
        self.resolver.get_input_type(field, operator)
    }

    pub fn get_options(&self, field: &str) -> BuilderResult<Vec<FieldOption>> {
        self.resolver.get_options(field)
    }

    pub fn default_operator(&self, field: &str) -> BuilderResult<String> {
        self.resolver.default_operator(field)
    }

    pub fn default_field(&self, entity: &EntityConfig) -> Option<FieldConfig> {
        self.resolver.default_field(entity)
    }

    /// The input type to render for a rule, when `widgets` has a widget
    /// for it.
    pub fn template_for_rule<W>(&self, rule_id: NodeId, widgets: &W) -> BuilderResult<Option<FieldType>>
    where
        W: InputWidgets + ?Sized,
    {
        let rule = self.rule(rule_id)?;
        let Some(input_type) = self.resolver.get_input_type(&rule.field, rule.operator_str())? else {
            return Ok(None);
        };
        if widgets.has_widget(&input_type) {
            return Ok(Some(input_type));
        }
        if !input_type.has_builtin_widget() {
            warn!(input_type = %input_type, "Could not find a widget for field type");
        }
        Ok(None)
    }

    pub fn class_names(&self, keys: &[&str]) -> String {
        resolve_class_names(&self.options.class_names, keys)
    }

    pub fn query_item_class_name(&self, is_rule_set: bool, invalid: bool) -> String {
        query_item_class_name(&self.options.class_names, is_rule_set, invalid)
    }

    /// Whether a ruleset renders with the invalid marker: it has no children
    /// and empty rulesets are not allowed.
    pub fn is_ruleset_invalid(&self, rule_set: NodeId) -> bool {
        !self.resolver.config().allow_empty_rulesets
            && self
                .data
                .find_rule_set(rule_set)
                .is_some_and(|set| set.rules.is_empty())
    }

    // ================================================================
    // Mutations
    // ================================================================

    /// Appends a rule on the first configured field to `target` (the root
    /// when `None`). Returns the new rule's id unless a hook did the append.
    pub fn add_rule(&mut self, target: Option<NodeId>) -> BuilderResult<Option<NodeId>> {
        if self.is_disabled() {
            return Ok(None);
        }
        let target = target.unwrap_or(self.data.id());

        let hook = self.resolver.config().hooks.add_rule.clone();
        let added = match hook {
            Some(hook) => {
                hook(self.rule_set_mut(target)?);
                self.renew_duplicate_ids();
                None
            }
            None => {
                let rule = self.new_rule()?;
                let id = rule.id();
                self.rule_set_mut(target)?.rules.push(RuleItem::Rule(rule));
                Some(id)
            }
        };

        debug!(rule_set = %target, "Rule added");
        self.notify();
        Ok(added)
    }

    fn new_rule(&self) -> BuilderResult<Rule> {
        let field = self
            .resolver
            .fields()
            .first()
            .ok_or(BuilderError::NoFieldsConfigured)?;
        let key = field.value.clone().unwrap_or_default();

        let mut rule = Rule::new(key.clone());
        rule.operator = Some(self.resolver.default_operator(&key)?);
        rule.value = field.default_value.as_ref().map(|default| default.resolve());
        rule.entity = field.entity.clone();
        Ok(rule)
    }

    /// Removes a rule by identity from `parent` (its enclosing ruleset when
    /// `None`) and drops its contexts.
    pub fn remove_rule(&mut self, rule_id: NodeId, parent: Option<NodeId>) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        let snapshot = self.rule(rule_id)?.clone();
        let parent = parent
            .or_else(|| self.data.parent_of(rule_id))
            .unwrap_or(self.data.id());

        let hook = self.resolver.config().hooks.remove_rule.clone();
        let parent_set = self.rule_set_mut(parent)?;
        match hook {
            Some(hook) => {
                hook(&snapshot, parent_set);
                self.renew_duplicate_ids();
            }
            None => {
                parent_set.remove_child(rule_id);
            }
        }
        self.contexts.get_mut().evict(rule_id);

        debug!(rule = %rule_id, "Rule removed");
        self.notify();
        Ok(())
    }

    /// Appends an empty `and` ruleset to `target` (the root when `None`).
    pub fn add_rule_set(&mut self, target: Option<NodeId>) -> BuilderResult<Option<NodeId>> {
        if self.is_disabled() {
            return Ok(None);
        }
        let target = target.unwrap_or(self.data.id());

        let hook = self.resolver.config().hooks.add_rule_set.clone();
        let parent = self.rule_set_mut(target)?;
        let added = match hook {
            Some(hook) => {
                hook(parent);
                self.renew_duplicate_ids();
                None
            }
            None => {
                let set = RuleSet::new(Condition::And);
                let id = set.id();
                parent.rules.push(RuleItem::Set(set));
                Some(id)
            }
        };

        debug!(rule_set = %target, "Ruleset added");
        self.notify();
        Ok(added)
    }

    /// Removes a ruleset by identity from `parent` (its enclosing ruleset
    /// when `None`). The root has no parent and is never removed.
    pub fn remove_rule_set(&mut self, rule_set: NodeId, parent: Option<NodeId>) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        let snapshot = self
            .data
            .find_rule_set(rule_set)
            .cloned()
            .ok_or(BuilderError::UnknownNode(rule_set))?;

        match parent.or_else(|| self.data.parent_of(rule_set)) {
            Some(parent) => {
                let hook = self.resolver.config().hooks.remove_rule_set.clone();
                let parent_set = self.rule_set_mut(parent)?;
                match hook {
                    Some(hook) => {
                        hook(&snapshot, parent_set);
                        self.renew_duplicate_ids();
                    }
                    None => {
                        parent_set.remove_child(rule_set);
                    }
                }
                let contexts = self.contexts.get_mut();
                for rule in snapshot.rule_ids() {
                    contexts.evict(rule);
                }
                debug!(rule_set = %rule_set, "Ruleset removed");
            }
            None => {
                warn!(rule_set = %rule_set, "Ruleset has no parent to be removed from; nothing removed");
            }
        }

        self.notify();
        Ok(())
    }

    /// Sets the AND/OR condition of a ruleset (the root when `None`).
    pub fn change_condition(&mut self, rule_set: Option<NodeId>, condition: Condition) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        let id = rule_set.unwrap_or(self.data.id());
        self.rule_set_mut(id)?.condition = condition;
        self.notify();
        Ok(())
    }

    /// Sets a rule's operator and coerces its value to the new input type.
    pub fn change_operator(&mut self, rule_id: NodeId, operator: impl Into<String>) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        let operator = operator.into();
        let mut rule = self.rule(rule_id)?.clone();
        rule.operator = Some(operator.clone());
        let value = self
            .resolver
            .coerce_value_for_operator(&operator, rule.value.clone(), &rule)?;

        let rule = self.rule_mut(rule_id)?;
        rule.operator = Some(operator);
        rule.value = value;
        self.notify();
        Ok(())
    }

    /// Writes a rule's value. `None` removes the value key.
    pub fn change_value(&mut self, rule_id: NodeId, value: Option<Value>) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        self.rule_mut(rule_id)?.value = value;
        self.notify();
        Ok(())
    }

    /// Switches a rule to another field: carries over or defaults the value,
    /// picks the field's default operator and rebuilds the rule's contexts.
    pub fn change_field(&mut self, rule_id: NodeId, field: &str) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        let next = self.resolver.field(field)?;
        let current_value = self.rule(rule_id)?.value.clone();
        let current = self
            .contexts
            .get_mut()
            .get(rule_id)
            .and_then(|contexts| contexts.input.as_ref())
            .and_then(|input| input.field.clone());

        let value = self.resolver.calculate_field_change_value(
            current.as_ref(),
            Some(&next),
            current_value.as_ref(),
            self.options.persist_value_on_field_change,
        );
        let operator = self.resolver.default_operator(field)?;

        let rule = self.rule_mut(rule_id)?;
        rule.field = field.to_string();
        rule.value = value;
        rule.operator = Some(operator);

        self.contexts.get_mut().evict_field_views(rule_id);
        self.input_context(rule_id)?;
        self.field_context(rule_id)?;
        self.operator_context(rule_id)?;
        self.entity_context(rule_id)?;

        debug!(rule = %rule_id, field = %field, "Rule field changed");
        self.notify();
        Ok(())
    }

    /// Switches a rule to another entity and, when the entity resolves a
    /// default field, to that field.
    ///
    /// `rule_set` narrows the lookup to one ruleset's direct children.
    /// An entity that is not configured leaves the rule untouched.
    pub fn change_entity(
        &mut self,
        rule_id: NodeId,
        entity: &str,
        rule_set: Option<NodeId>,
    ) -> BuilderResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        let Some(entity) = self.resolver.entity(entity).cloned() else {
            debug!(entity = %entity, "Entity not configured; rule unchanged");
            return Ok(());
        };
        if let Some(set) = rule_set {
            let set = self
                .data
                .find_rule_set(set)
                .ok_or(BuilderError::UnknownNode(set))?;
            if set.position_of(rule_id).is_none() {
                return Err(BuilderError::UnknownNode(rule_id));
            }
        }

        let default_field = self.resolver.default_field(&entity);
        let rule = self.rule_mut(rule_id)?;
        rule.entity = entity.value.clone();

        match default_field.and_then(|field| field.value) {
            Some(field) => {
                rule.field = field.clone();
                self.change_field(rule_id, &field)
            }
            None => {
                self.notify();
                Ok(())
            }
        }
    }

    /// Starts collapsing or expanding a ruleset (the root when `None`).
    /// `None` when collapsing is not allowed or the ruleset is unknown.
    pub fn toggle_collapse(&self, rule_set: Option<NodeId>) -> Option<CollapseToggle> {
        if !self.options.allow_collapse {
            return None;
        }
        let id = rule_set.unwrap_or(self.data.id());
        self.data.find_rule_set(id).map(|_| CollapseToggle {
            rule_set: id,
            delay: COLLAPSE_TRANSITION_DELAY,
        })
    }

    /// Flips `collapsed` once the transition delay has passed. Returns false
    /// when the ruleset is gone by then.
    pub fn apply_collapse(&mut self, toggle: CollapseToggle) -> bool {
        match self.data.find_rule_set_mut(toggle.rule_set) {
            Some(set) => {
                set.collapsed = !set.collapsed;
                true
            }
            None => false,
        }
    }

    // ================================================================
    // View contexts
    // ================================================================

    pub fn input_context(&self, rule_id: NodeId) -> BuilderResult<Arc<InputContext>> {
        self.memoized(rule_id, |c| &mut c.input, |rule| {
            Ok(InputContext {
                rule: rule.id(),
                field: self.resolver.config().field(&rule.field).cloned(),
                options: self.resolver.get_options(&rule.field)?,
            })
        })
    }

    pub fn operator_context(&self, rule_id: NodeId) -> BuilderResult<Arc<OperatorContext>> {
        self.memoized(rule_id, |c| &mut c.operator, |rule| {
            Ok(OperatorContext {
                rule: rule.id(),
                operators: self.resolver.get_operators(&rule.field)?,
            })
        })
    }

    pub fn field_context(&self, rule_id: NodeId) -> BuilderResult<Arc<FieldContext>> {
        self.memoized(rule_id, |c| &mut c.field, |rule| {
            Ok(FieldContext {
                rule: rule.id(),
                fields: Arc::clone(self.resolver.fields()),
            })
        })
    }

    pub fn entity_context(&self, rule_id: NodeId) -> BuilderResult<Arc<EntityContext>> {
        self.memoized(rule_id, |c| &mut c.entity, |rule| {
            Ok(EntityContext {
                rule: rule.id(),
                entities: self
                    .resolver
                    .entities()
                    .cloned()
                    .unwrap_or_else(|| Arc::from(Vec::new())),
            })
        })
    }

    pub fn remove_button_context(&self, rule_id: NodeId) -> BuilderResult<Arc<RemoveButtonContext>> {
        self.memoized(rule_id, |c| &mut c.remove_button, |rule| {
            Ok(RemoveButtonContext { rule: rule.id() })
        })
    }

    /// The root's button group. Built once per tree.
    pub fn button_group_context(&self) -> Arc<ButtonGroupContext> {
        let mut contexts = self.contexts.borrow_mut();
        let context = contexts.button_group.get_or_insert_with(|| {
            Arc::new(ButtonGroupContext {
                rule_set: self.data.id(),
                allow_rule_set: self.options.allow_rule_set,
            })
        });
        Arc::clone(context)
    }

    pub fn switch_group_context(&self, rule_set: Option<NodeId>) -> BuilderResult<SwitchGroupContext> {
        let set = self.rule_set(rule_set)?;
        Ok(SwitchGroupContext {
            rule_set: set.id(),
            condition: set.condition,
        })
    }

    pub fn arrow_icon_context(&self, rule_set: Option<NodeId>) -> BuilderResult<ArrowIconContext> {
        let set = self.rule_set(rule_set)?;
        Ok(ArrowIconContext {
            rule_set: set.id(),
            collapsed: set.collapsed,
        })
    }

    pub fn empty_warning_context(&self, rule_set: Option<NodeId>) -> BuilderResult<EmptyWarningContext> {
        let set = self.rule_set(rule_set)?;
        Ok(EmptyWarningContext {
            rule_set: set.id(),
            message: self.options.empty_message.clone(),
        })
    }

    /// Whether any context is cached for a rule.
    pub fn has_cached_contexts(&self, rule_id: NodeId) -> bool {
        self.contexts.borrow().contains(rule_id)
    }

    fn memoized<T>(
        &self,
        rule_id: NodeId,
        slot: impl Fn(&mut RuleContexts) -> &mut Option<Arc<T>>,
        build: impl FnOnce(&Rule) -> BuilderResult<T>,
    ) -> BuilderResult<Arc<T>> {
        let rule = self.rule(rule_id)?;
        if let Some(cached) = self
            .contexts
            .borrow_mut()
            .get_mut(rule_id)
            .and_then(|contexts| slot(contexts).clone())
        {
            return Ok(cached);
        }
        let context = Arc::new(build(rule)?);
        *slot(self.contexts.borrow_mut().entry(rule_id)) = Some(Arc::clone(&context));
        Ok(context)
    }

    // ================================================================
    // Tree access
    // ================================================================

    pub fn rule(&self, id: NodeId) -> BuilderResult<&Rule> {
        self.data.find_rule(id).ok_or(BuilderError::UnknownNode(id))
    }

    fn rule_mut(&mut self, id: NodeId) -> BuilderResult<&mut Rule> {
        self.data.find_rule_mut(id).ok_or(BuilderError::UnknownNode(id))
    }

    fn rule_set(&self, id: Option<NodeId>) -> BuilderResult<&RuleSet> {
        let id = id.unwrap_or(self.data.id());
        self.data.find_rule_set(id).ok_or(BuilderError::UnknownNode(id))
    }

    fn rule_set_mut(&mut self, id: NodeId) -> BuilderResult<&mut RuleSet> {
        self.data
            .find_rule_set_mut(id)
            .ok_or(BuilderError::UnknownNode(id))
    }

    fn renew_duplicate_ids(&mut self) {
        let renewed = self.data.reassign_duplicate_ids();
        if renewed > 0 {
            debug!(renewed, "Duplicate node ids renewed");
        }
    }

    // ================================================================
    // Notification
    // ================================================================

    fn notify(&mut self) {
        self.handle_touched();
        self.handle_change();
    }

    fn handle_touched(&mut self) {
        if let Some(touched) = self.on_touched.as_mut() {
            touched();
        }
        if let Some(touched) = self.parent_touched.as_mut() {
            touched();
        }
    }

    fn handle_change(&mut self) {
        if let Some(change) = self.on_change.as_mut() {
            change(&self.data);
        }
        if let Some(change) = self.parent_change.as_mut() {
            change();
        }
    }
}
