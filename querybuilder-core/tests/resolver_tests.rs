use pretty_assertions::assert_eq;
use querybuilder_core::{BuilderError, BuilderOptions, QueryBuilder};
use querybuilder_model::{BuilderConfig, EntityConfig, FieldConfig, FieldOption, FieldType};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn ops(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn sample_config() -> BuilderConfig {
    BuilderConfig::new()
        .with_field("name", FieldConfig::string("Name"))
        .with_field("age", FieldConfig::number("Age"))
        .with_field("birthday", FieldConfig::date("Birthday"))
        .with_field("alarm", FieldConfig::time("Alarm"))
        .with_field(
            "gender",
            FieldConfig::category(
                "Gender",
                vec![
                    FieldOption::new("Male", json!("m")),
                    FieldOption::new("Female", json!("f")),
                ],
            ),
        )
        .with_field("active", FieldConfig::boolean("Active"))
        .with_field("notes", FieldConfig::new("Notes", "textarea"))
}

fn builder() -> QueryBuilder {
    QueryBuilder::new(Arc::new(sample_config()))
}

// ── Fields and entities ──────────────────────────────────────────

#[test]
fn fields_keep_declaration_order_and_default_value_to_key() {
    let qb = builder();
    let values: Vec<_> = qb.fields().iter().map(|f| f.value.clone().unwrap()).collect();
    assert_eq!(
        values,
        ops(&["name", "age", "birthday", "alarm", "gender", "active", "notes"])
    );
}

#[test]
fn explicit_field_value_is_not_overwritten() {
    let config = BuilderConfig::new().with_field("a", FieldConfig::string("A").with_value("alias"));
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(qb.fields()[0].value.as_deref(), Some("alias"));
}

#[test]
fn empty_field_value_falls_back_to_key() {
    let config = BuilderConfig::new().with_field("a", FieldConfig::string("A").with_value(""));
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(qb.fields()[0].value.as_deref(), Some("a"));
}

#[test]
fn entities_are_none_without_configuration() {
    assert!(builder().entities().is_none());
}

#[test]
fn entities_default_value_to_key() {
    let config = sample_config()
        .with_entity("physical", EntityConfig::new("Physical"))
        .with_entity("other", EntityConfig::new("Other").with_value("misc"));
    let qb = QueryBuilder::new(Arc::new(config));
    let values: Vec<_> = qb
        .entities()
        .unwrap()
        .iter()
        .map(|e| e.value.clone().unwrap())
        .collect();
    assert_eq!(values, ops(&["physical", "misc"]));
}

#[test]
fn get_fields_filters_by_entity_only_when_entities_exist() {
    let config = BuilderConfig::new()
        .with_field("age", FieldConfig::number("Age").with_entity("physical"))
        .with_field("name", FieldConfig::string("Name").with_entity("nonphysical"));

    let without_entities = QueryBuilder::new(Arc::new(config.clone()));
    assert_eq!(without_entities.get_fields(Some("physical")).len(), 2);

    let with_entities = QueryBuilder::new(Arc::new(
        config
            .with_entity("physical", EntityConfig::new("Physical"))
            .with_entity("nonphysical", EntityConfig::new("Nonphysical")),
    ));
    let physical = with_entities.get_fields(Some("physical"));
    assert_eq!(physical.len(), 1);
    assert_eq!(physical[0].name, "Age");
    assert_eq!(with_entities.get_fields(None).len(), 2);
}

// ── Operators ────────────────────────────────────────────────────

#[test]
fn operators_follow_the_builtin_type_table() {
    let qb = builder();
    assert_eq!(qb.get_operators("name").unwrap().to_vec(), ops(&["=", "!=", "contains", "like"]));
    for key in ["age", "birthday", "alarm"] {
        assert_eq!(
            qb.get_operators(key).unwrap().to_vec(),
            ops(&["=", "!=", ">", ">=", "<", "<="])
        );
    }
    assert_eq!(qb.get_operators("gender").unwrap().to_vec(), ops(&["=", "!=", "in", "not in"]));
    assert_eq!(qb.get_operators("active").unwrap().to_vec(), ops(&["="]));
}

#[test]
fn type_without_table_entry_resolves_no_operators() {
    assert!(builder().get_operators("notes").unwrap().is_empty());
}

#[test]
fn explicit_operators_win_over_type() {
    let config = BuilderConfig::new().with_field("age", FieldConfig::number("Age").with_operators(["=", "<"]));
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(qb.get_operators("age").unwrap().to_vec(), ops(&["=", "<"]));
}

#[test]
fn nullable_appends_null_checks() {
    let config = BuilderConfig::new().with_field("age", FieldConfig::number("Age").nullable());
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(
        qb.get_operators("age").unwrap().to_vec(),
        ops(&["=", "!=", ">", ">=", "<", "<=", "is null", "is not null"])
    );
}

#[test]
fn nullable_extends_explicit_operators() {
    let config = BuilderConfig::new()
        .with_field("age", FieldConfig::number("Age").with_operators(["=", "<"]).nullable());
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(
        qb.get_operators("age").unwrap().to_vec(),
        ops(&["=", "<", "is null", "is not null"])
    );
}

#[test]
fn operator_map_replaces_builtin_table() {
    let mut map = HashMap::new();
    map.insert("number".to_string(), ops(&["eq", "gt"]));
    let options = BuilderOptions {
        operator_map: Some(map),
        ..BuilderOptions::default()
    };
    let qb = QueryBuilder::with_options(Arc::new(sample_config()), options);
    assert_eq!(qb.get_operators("age").unwrap().to_vec(), ops(&["eq", "gt"]));
    // Types missing from a custom map get nothing, not the built-in set.
    assert!(qb.get_operators("name").unwrap().is_empty());
}

#[test]
fn operators_hook_bypasses_nullable() {
    let config = BuilderConfig::new()
        .with_field("age", FieldConfig::number("Age").nullable())
        .on_get_operators(|key, field| vec![format!("{key}:{}", field.name)]);
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(qb.get_operators("age").unwrap().to_vec(), ops(&["age:Age"]));
}

#[test]
fn operators_for_unknown_field_is_an_error() {
    let err = builder().get_operators("ghost").unwrap_err();
    assert!(matches!(err, BuilderError::UnknownField(ref key) if key == "ghost"));
}

#[test]
fn operators_are_cached_per_config() {
    let config = Arc::new(sample_config());
    let mut qb = QueryBuilder::new(Arc::clone(&config));

    let first = qb.get_operators("age").unwrap();
    let second = qb.get_operators("age").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    qb.set_config(Arc::clone(&config));
    assert!(Arc::ptr_eq(&first, &qb.get_operators("age").unwrap()));

    qb.set_config(Arc::new(sample_config()));
    let recomputed = qb.get_operators("age").unwrap();
    assert!(!Arc::ptr_eq(&first, &recomputed));
    assert_eq!(first, recomputed);
}

// ── Input types ──────────────────────────────────────────────────

#[test]
fn input_type_is_field_type_by_default() {
    let qb = builder();
    assert_eq!(qb.get_input_type("age", "=").unwrap(), Some(FieldType::Number));
    assert_eq!(qb.get_input_type("name", "like").unwrap(), Some(FieldType::String));
}

#[test]
fn category_in_resolves_to_multiselect() {
    let qb = builder();
    assert_eq!(qb.get_input_type("gender", "in").unwrap(), Some(FieldType::Multiselect));
    assert_eq!(qb.get_input_type("gender", "not in").unwrap(), Some(FieldType::Multiselect));
    assert_eq!(qb.get_input_type("active", "in").unwrap(), Some(FieldType::Multiselect));
    assert_eq!(qb.get_input_type("gender", "=").unwrap(), Some(FieldType::Category));
}

#[test]
fn in_on_other_types_keeps_field_type() {
    assert_eq!(builder().get_input_type("age", "in").unwrap(), Some(FieldType::Number));
}

#[test]
fn null_checks_have_no_input() {
    let qb = builder();
    assert_eq!(qb.get_input_type("age", "is null").unwrap(), None);
    assert_eq!(qb.get_input_type("age", "is not null").unwrap(), None);
}

#[test]
fn input_type_for_unknown_field_is_an_error() {
    assert!(matches!(
        builder().get_input_type("ghost", "="),
        Err(BuilderError::UnknownField(_))
    ));
}

#[test]
fn input_type_hook_answers_even_for_unknown_fields() {
    let config = BuilderConfig::new().on_get_input_type(|_, op| Some(FieldType::from(op)));
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(
        qb.get_input_type("ghost", "slider").unwrap(),
        Some(FieldType::Custom("slider".into()))
    );
}

// ── Options ──────────────────────────────────────────────────────

#[test]
fn options_come_from_field() {
    let qb = builder();
    let options = qb.get_options("gender").unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[1].value, json!("f"));
    assert!(qb.get_options("age").unwrap().is_empty());
}

#[test]
fn options_hook_replaces_lookup() {
    let config = sample_config().on_get_options(|key| vec![FieldOption::new(key, json!(1))]);
    let qb = QueryBuilder::new(Arc::new(config));
    assert_eq!(qb.get_options("age").unwrap(), vec![FieldOption::new("age", json!(1))]);
}
