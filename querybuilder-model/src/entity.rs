use crate::DefaultSpec;
use serde::Deserialize;

/// An optional grouping of fields. When entities are configured, a rule
/// picks an entity first and the field list is filtered to that entity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    /// Key of the field selected when a rule switches to this entity.
    #[serde(default)]
    pub default_field: Option<DefaultSpec<String>>,
}

impl EntityConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_default_field(mut self, field: impl Into<DefaultSpec<String>>) -> Self {
        self.default_field = Some(field.into());
        self
    }
}
