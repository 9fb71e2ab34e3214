use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// A default that is either a literal or computed on demand.
///
/// JSON configuration can only express literals; factories are attached in
/// code. Resolution happens each time a default is needed, so a factory can
/// hand out a fresh value (a timestamp, an empty list) per rule.
#[derive(Clone)]
pub enum DefaultSpec<T> {
    Value(T),
    Factory(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T> DefaultSpec<T> {
    /// Wraps a zero-argument factory.
    pub fn factory(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::Factory(Arc::new(f))
    }
}

impl<T: Clone> DefaultSpec<T> {
    /// Invokes the factory, or returns a copy of the literal.
    pub fn resolve(&self) -> T {
        match self {
            Self::Value(value) => value.clone(),
            Self::Factory(f) => f(),
        }
    }
}

impl<T> From<T> for DefaultSpec<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for DefaultSpec<String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl<T: fmt::Debug> fmt::Debug for DefaultSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DefaultSpec<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Value)
    }
}

/// Field deserializer that keeps an explicit JSON `null` as `Some(..)`.
///
/// Pair with `#[serde(default)]` so a missing key still yields `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
