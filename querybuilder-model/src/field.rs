use crate::default::present;
use crate::{DefaultSpec, RuleValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Semantic type of a field, and the value widget an input resolves to.
///
/// Serialized as a bare string. Names outside the fixed vocabulary are kept
/// as [`FieldType::Custom`] so a renderer can register its own widgets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Number,
    Time,
    Date,
    Category,
    Boolean,
    Multiselect,
    Textarea,
    Custom(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Time => "time",
            Self::Date => "date",
            Self::Category => "category",
            Self::Boolean => "boolean",
            Self::Multiselect => "multiselect",
            Self::Textarea => "textarea",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Types the stock renderer ships a widget for.
    pub fn has_builtin_widget(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Number
                | Self::Time
                | Self::Date
                | Self::Category
                | Self::Boolean
                | Self::Multiselect
        )
    }

    /// Types whose value can carry over when switching between two fields of
    /// the same type.
    pub fn is_persistable(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::Time | Self::Date | Self::Boolean
        )
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "number" => Self::Number,
            "time" => Self::Time,
            "date" => Self::Date,
            "category" => Self::Category,
            "boolean" => Self::Boolean,
            "multiselect" => Self::Multiselect,
            "textarea" => Self::Textarea,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a category-like field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub name: String,
    pub value: Value,
}

impl FieldOption {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Configuration of a selectable field.
///
/// `value` is the key rules store in `Rule::field`; when unset it is filled
/// from the configuration map key.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default)]
    pub operators: Option<Vec<String>>,
    #[serde(default)]
    pub nullable: bool,
    /// `"defaultValue": null` is an explicit null default, not "no default".
    #[serde(default, deserialize_with = "present")]
    pub default_value: Option<DefaultSpec<Value>>,
    #[serde(default)]
    pub default_operator: Option<DefaultSpec<String>>,
    #[serde(skip)]
    pub validator: Option<Arc<dyn RuleValidator>>,
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("value", &self.value)
            .field("entity", &self.entity)
            .field("options", &self.options)
            .field("operators", &self.operators)
            .field("nullable", &self.nullable)
            .field("default_value", &self.default_value)
            .field("default_operator", &self.default_operator)
            .field("validator", &self.validator.as_ref().map(|_| ".."))
            .finish()
    }
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// Shorthand for a free-text field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Shorthand for a numeric field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    /// Shorthand for a date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    /// Shorthand for a time field.
    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Time)
    }

    /// Shorthand for a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Shorthand for a category field with fixed options.
    pub fn category(name: impl Into<String>, options: Vec<FieldOption>) -> Self {
        Self {
            options: Some(options),
            ..Self::new(name, FieldType::Category)
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Replaces the type-derived operator list.
    #[must_use]
    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators = Some(operators.into_iter().map(Into::into).collect());
        self
    }

    /// Appends `is null` / `is not null` to the resolved operators.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, default: impl Into<DefaultSpec<Value>>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    #[must_use]
    pub fn with_default_operator(mut self, default: impl Into<DefaultSpec<String>>) -> Self {
        self.default_operator = Some(default.into());
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl RuleValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}
