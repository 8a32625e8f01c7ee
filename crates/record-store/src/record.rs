use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{RecordId, Result, StoreError};

/// The body of a record: a flat JSON object keyed by column name.
pub type Fields = serde_json::Map<String, Value>;

/// Keys managed by the store itself. They never appear in [`Record::fields`].
pub const RESERVED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// A single row of a table as seen by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique id of the record within its table.
    pub id: RecordId,

    /// Name of the table the record lives in.
    pub table: String,

    /// Column values, excluding the reserved keys.
    pub fields: Fields,

    /// When the record was inserted.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a fresh record stamped with the current time.
    pub fn new(table: impl Into<String>, id: RecordId, fields: Fields) -> Self {
        let now = Utc::now();
        Self {
            id,
            table: table.into(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the value of a single column, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the full JSON document: the fields plus `id`, `created_at`
    /// and `updated_at`.
    pub fn document(&self) -> Value {
        let mut doc = self.fields.clone();
        doc.insert("id".to_string(), Value::String(self.id.to_string()));
        doc.insert(
            "created_at".to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        doc.insert(
            "updated_at".to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        Value::Object(doc)
    }

    /// Deserializes the full document into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.document())?)
    }

    /// Merges a patch into the fields and bumps `updated_at`.
    pub fn apply_patch(&mut self, patch: Fields) {
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
        self.updated_at = Utc::now();
    }
}

/// Serializes a value into record fields, dropping the reserved keys.
///
/// Fails if the value does not serialize to a JSON object.
pub fn fields_of<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            for key in RESERVED_FIELDS {
                map.remove(key);
            }
            Ok(map)
        }
        other => Err(StoreError::InvalidFields(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Rejects field maps that try to write store-managed keys.
pub fn validate_fields(fields: &Fields) -> Result<()> {
    for key in RESERVED_FIELDS {
        if fields.contains_key(key) {
            return Err(StoreError::InvalidFields(format!(
                "'{key}' is managed by the store and cannot be written"
            )));
        }
    }
    Ok(())
}
