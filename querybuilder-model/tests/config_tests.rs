use pretty_assertions::assert_eq;
use querybuilder_model::{BuilderConfig, ConfigMap, EntityConfig, FieldConfig, FieldType};
use serde_json::json;

// ── ConfigMap ────────────────────────────────────────────────────

#[test]
fn config_map_keeps_insertion_order() {
    let map: ConfigMap<u32> = [("zeta", 1), ("alpha", 2), ("mid", 3)].into_iter().collect();
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn config_map_replace_keeps_position() {
    let mut map = ConfigMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    assert_eq!(map.insert("a", 10), Some(1));
    let entries: Vec<(&str, &i32)> = map.iter().collect();
    assert_eq!(entries, vec![("a", &10), ("b", &2)]);
    assert_eq!(map.len(), 2);
}

#[test]
fn config_map_lookup() {
    let mut map = ConfigMap::new();
    assert!(map.is_empty());
    map.insert("a", 1);
    assert!(map.contains_key("a"));
    assert!(!map.contains_key("b"));
    *map.get_mut("a").unwrap() += 1;
    assert_eq!(map.get("a"), Some(&2));
}

#[test]
fn config_map_deserializes_in_document_order() {
    let map: ConfigMap<u32> = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn config_map_rejects_non_maps() {
    assert!(serde_json::from_str::<ConfigMap<u32>>("[1, 2]").is_err());
}

// ── BuilderConfig ────────────────────────────────────────────────

#[test]
fn builder_config_from_json() {
    let config = BuilderConfig::from_json(
        r#"{
            "fields": {
                "name": {"name": "Name", "type": "string"},
                "age": {"name": "Age", "type": "number"},
                "email": {"name": "Email", "type": "string"},
                "active": {"name": "Active", "type": "boolean"}
            },
            "allowEmptyRulesets": true
        }"#,
    )
    .unwrap();

    let keys: Vec<&str> = config.fields.keys().collect();
    assert_eq!(keys, vec!["name", "age", "email", "active"]);
    assert_eq!(config.field("age").unwrap().field_type, Some(FieldType::Number));
    assert!(config.allow_empty_rulesets);
    assert!(config.entities.is_none());
}

#[test]
fn builder_config_with_entities_from_json() {
    let config = BuilderConfig::from_json(
        r#"{
            "entities": {
                "physical": {"name": "Physical Attributes", "defaultField": "age"},
                "nonphysical": {"name": "Nonphysical Attributes"}
            },
            "fields": {
                "age": {"name": "Age", "type": "number", "entity": "physical"}
            }
        }"#,
    )
    .unwrap();

    let entities = config.entities.as_ref().unwrap();
    assert_eq!(entities.len(), 2);
    let physical = entities.get("physical").unwrap();
    assert_eq!(physical.default_field.as_ref().map(|d| d.resolve()), Some("age".into()));
    assert!(entities.get("nonphysical").unwrap().default_field.is_none());
}

#[test]
fn empty_json_object_is_an_empty_config() {
    let config = BuilderConfig::from_json("{}").unwrap();
    assert!(config.fields.is_empty());
    assert!(!config.allow_empty_rulesets);
}

#[test]
fn builder_methods_compose() {
    let config = BuilderConfig::new()
        .with_field("age", FieldConfig::number("Age").with_entity("person"))
        .with_entity("person", EntityConfig::new("Person").with_default_field("age"))
        .allow_empty_rulesets(true);

    assert!(config.field("age").is_some());
    assert!(config.field("missing").is_none());
    assert!(config.entities.as_ref().unwrap().contains_key("person"));
    assert!(config.allow_empty_rulesets);
}

// ── Hooks ────────────────────────────────────────────────────────

#[test]
fn hooks_default_to_unset() {
    let config = BuilderConfig::new();
    assert!(config.hooks.get_operators.is_none());
    assert!(config.hooks.remove_rule_set.is_none());
}

#[test]
fn hooks_are_callable_after_registration() {
    let config = BuilderConfig::new()
        .on_get_operators(|key, _| vec![format!("{key}-op")])
        .on_get_input_type(|_, op| (op == "in").then_some(FieldType::Multiselect))
        .on_coerce_value_for_operator(|_, _, _| Some(json!("coerced")));

    let field = FieldConfig::string("Name");
    let ops = config.hooks.get_operators.as_ref().unwrap()("name", &field);
    assert_eq!(ops, vec!["name-op".to_string()]);

    let input = config.hooks.get_input_type.as_ref().unwrap();
    assert_eq!(input("name", "in"), Some(FieldType::Multiselect));
    assert_eq!(input("name", "="), None);
}

#[test]
fn hooks_debug_lists_presence() {
    let config = BuilderConfig::new().on_add_rule(|set| set.rules.clear());
    let debug = format!("{:?}", config.hooks);
    assert!(debug.contains("add_rule: true"));
    assert!(debug.contains("remove_rule: false"));
}

#[test]
fn cloned_config_shares_hooks() {
    let config = BuilderConfig::new().on_get_options(|_| Vec::new());
    let cloned = config.clone();
    assert!(std::sync::Arc::ptr_eq(
        config.hooks.get_options.as_ref().unwrap(),
        cloned.hooks.get_options.as_ref().unwrap()
    ));
}
