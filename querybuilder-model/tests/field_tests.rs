use pretty_assertions::assert_eq;
use querybuilder_model::{DefaultSpec, FieldConfig, FieldOption, FieldType};
use serde_json::{json, Value};

// ── FieldType names ──────────────────────────────────────────────

#[test]
fn field_type_parses_fixed_vocabulary() {
    assert_eq!(FieldType::from("string"), FieldType::String);
    assert_eq!(FieldType::from("number"), FieldType::Number);
    assert_eq!(FieldType::from("time"), FieldType::Time);
    assert_eq!(FieldType::from("date"), FieldType::Date);
    assert_eq!(FieldType::from("category"), FieldType::Category);
    assert_eq!(FieldType::from("boolean"), FieldType::Boolean);
    assert_eq!(FieldType::from("multiselect"), FieldType::Multiselect);
    assert_eq!(FieldType::from("textarea"), FieldType::Textarea);
}

#[test]
fn unknown_names_become_custom() {
    let t = FieldType::from("color");
    assert_eq!(t, FieldType::Custom("color".into()));
    assert_eq!(t.as_str(), "color");
    assert_eq!(t.to_string(), "color");
}

#[test]
fn field_type_serializes_as_bare_string() {
    assert_eq!(serde_json::to_value(FieldType::Multiselect).unwrap(), json!("multiselect"));
    let parsed: FieldType = serde_json::from_value(json!("textarea")).unwrap();
    assert_eq!(parsed, FieldType::Textarea);
}

#[test]
fn builtin_widgets_exclude_textarea_and_custom() {
    assert!(FieldType::Multiselect.has_builtin_widget());
    assert!(FieldType::Category.has_builtin_widget());
    assert!(!FieldType::Textarea.has_builtin_widget());
    assert!(!FieldType::Custom("color".into()).has_builtin_widget());
}

#[test]
fn persistable_types() {
    for t in [FieldType::String, FieldType::Number, FieldType::Time, FieldType::Date, FieldType::Boolean] {
        assert!(t.is_persistable(), "{t} should be persistable");
    }
    assert!(!FieldType::Category.is_persistable());
    assert!(!FieldType::Multiselect.is_persistable());
}

// ── Shorthands ───────────────────────────────────────────────────

#[test]
fn shorthand_constructors_set_type() {
    assert_eq!(FieldConfig::string("Name").field_type, Some(FieldType::String));
    assert_eq!(FieldConfig::number("Age").field_type, Some(FieldType::Number));
    assert_eq!(FieldConfig::date("Birthday").field_type, Some(FieldType::Date));
    assert_eq!(FieldConfig::time("Alarm").field_type, Some(FieldType::Time));
    assert_eq!(FieldConfig::boolean("Active").field_type, Some(FieldType::Boolean));
}

#[test]
fn category_carries_options() {
    let f = FieldConfig::category(
        "Gender",
        vec![FieldOption::new("Male", json!("m")), FieldOption::new("Female", json!("f"))],
    );
    assert_eq!(f.field_type, Some(FieldType::Category));
    assert_eq!(f.options.as_ref().map(Vec::len), Some(2));
}

#[test]
fn builder_methods_compose() {
    let f = FieldConfig::number("Age")
        .with_value("age")
        .with_entity("person")
        .with_operators(["=", ">"])
        .nullable()
        .with_default_value(json!(18))
        .with_default_operator(">");
    assert_eq!(f.value.as_deref(), Some("age"));
    assert_eq!(f.entity.as_deref(), Some("person"));
    assert_eq!(f.operators, Some(vec!["=".to_string(), ">".to_string()]));
    assert!(f.nullable);
    assert_eq!(f.default_value.map(|d| d.resolve()), Some(json!(18)));
    assert_eq!(f.default_operator.map(|d| d.resolve()), Some(">".to_string()));
}

// ── JSON configuration ───────────────────────────────────────────

#[test]
fn deserializes_camel_case_keys() {
    let f: FieldConfig = serde_json::from_value(json!({
        "name": "Age",
        "type": "number",
        "nullable": true,
        "defaultValue": 21,
        "defaultOperator": ">=",
        "operators": ["=", ">="]
    }))
    .unwrap();
    assert_eq!(f.name, "Age");
    assert_eq!(f.field_type, Some(FieldType::Number));
    assert!(f.nullable);
    assert_eq!(f.default_value.unwrap().resolve(), json!(21));
    assert_eq!(f.default_operator.unwrap().resolve(), ">=");
    assert!(f.validator.is_none());
}

#[test]
fn explicit_null_default_value_is_kept() {
    let f: FieldConfig = serde_json::from_value(json!({"name": "Note", "defaultValue": null})).unwrap();
    assert_eq!(f.default_value.map(|d| d.resolve()), Some(Value::Null));
}

#[test]
fn missing_type_is_none() {
    let f: FieldConfig = serde_json::from_value(json!({"name": "Loose"})).unwrap();
    assert_eq!(f.field_type, None);
    assert!(!f.nullable);
}

#[test]
fn debug_output_hides_validator() {
    let f = FieldConfig::string("Name").with_validator(
        |_: &querybuilder_types::Rule, _: &querybuilder_types::RuleSet| -> Result<(), Value> { Ok(()) },
    );
    let debug = format!("{f:?}");
    assert!(debug.contains("FieldConfig"));
    assert!(debug.contains("validator: Some(\"..\")"));
}

// ── DefaultSpec ──────────────────────────────────────────────────

#[test]
fn literal_default_resolves_to_copy() {
    let default = DefaultSpec::from(json!([1, 2]));
    assert_eq!(default.resolve(), json!([1, 2]));
    assert_eq!(default.resolve(), json!([1, 2]));
}

#[test]
fn factory_default_is_called_on_each_resolve() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let default = DefaultSpec::factory(move || json!(counter.fetch_add(1, Ordering::SeqCst)));

    assert_eq!(default.resolve(), json!(0));
    assert_eq!(default.resolve(), json!(1));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn factory_debug_is_opaque() {
    let default: DefaultSpec<String> = DefaultSpec::factory(|| "x".into());
    assert_eq!(format!("{default:?}"), "Factory(..)");
}
