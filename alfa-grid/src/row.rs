//! Dynamic table row

use std::collections::HashMap;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::Value;

/// Field holding a row's identity, compared against the busy row id.
pub const ID_FIELD: &str = "id";

/// An opaque record displayed by the table.
///
/// Rows hold field values as a `HashMap<String, Value>`. The engine never
/// mutates a row it was given; it only tracks rows by their position in the
/// filtered, sorted and paged view.
///
/// # Example
///
/// ```
/// use alfa_grid::{Row, Value};
///
/// let row = Row::new()
///     .set("id", "#SO-00003")
///     .set("aseguradora", "Gaspar Arhanes")
///     .set("monto", 2874.56);
///
/// assert_eq!(row.get("monto"), Some(&Value::Float(2874.56)));
/// assert_eq!(row.value("missing"), &Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field value, treating a missing field as `Null`.
    pub fn value(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns the row's `id` field, if present and not null.
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD).filter(|v| !v.is_null())
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
