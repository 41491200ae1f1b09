//! Container parameters
//!
//! Parameters are plain configuration values (the `parameters:` section of a
//! configuration file) made available to extensions at build time and, when
//! exported, to services at run time.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level parameters keyed by name
pub type Parameters = BTreeMap<String, ParameterValue>;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ParameterValue>),
    Map(BTreeMap<String, ParameterValue>),
    /// Value that has no plain representation, carried by its type name
    #[serde(skip)]
    Opaque(String),
}

impl ParameterValue {
    /// Build a map value from key/value pairs
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        ParameterValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Build a list value
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParameterValue>,
    {
        ParameterValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Describe a value by its type only
    pub fn opaque<T: ?Sized>() -> Self {
        ParameterValue::Opaque(short_type_name(std::any::type_name::<T>()).to_string())
    }

    /// Check whether this is a list or map
    pub fn is_nested(&self) -> bool {
        matches!(self, ParameterValue::List(_) | ParameterValue::Map(_))
    }
}

fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Int(i64::from(value))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParameterValue::Null, Into::into)
    }
}
