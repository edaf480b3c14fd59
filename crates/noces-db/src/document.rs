//! Stored documents and JSON-level write operations (merge, dotted patches).

use chrono::{DateTime, Utc};
use noces_core::collections::Collection;
use noces_core::entities::Entity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime};
use crate::query::validate_field_path;

/// Keys owned by the store. They live in table columns, never in `data`.
pub const MANAGED_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// One document as stored: the JSON body plus store-managed metadata.
///
/// Serializes as a flat object (`data` fields plus `id`, `created_at`,
/// `updated_at`), the same shape the typed entities deserialize from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    #[serde(skip)]
    pub collection: Collection,
    #[serde(flatten)]
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub(crate) fn from_row(collection: Collection, row: &libsql::Row) -> Result<Self, DatabaseError> {
        let id: String = row.get(0)?;
        let raw: String = row.get(1)?;
        let data = match serde_json::from_str(&raw)? {
            Value::Object(map) => map,
            other => {
                return Err(DatabaseError::Query(format!(
                    "document {collection}/{id} is not a JSON object: {other}"
                )));
            }
        };
        Ok(Self {
            id,
            collection,
            data,
            created_at: parse_datetime(&row.get::<String>(2)?)?,
            updated_at: parse_datetime(&row.get::<String>(3)?)?,
        })
    }

    /// Read a (possibly dotted) field.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.data, path)
    }

    /// Read a string field.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    #[must_use]
    pub fn planner_id(&self) -> Option<&str> {
        self.get_str("planner_id")
    }

    /// The flat JSON object, with managed fields included.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = self.data.clone();
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert(
            "created_at".into(),
            Value::String(format_datetime(self.created_at)),
        );
        map.insert(
            "updated_at".into(),
            Value::String(format_datetime(self.updated_at)),
        );
        Value::Object(map)
    }

    /// Deserialize into any type shaped like the flat JSON object.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if the stored data does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DatabaseError> {
        serde_json::from_value(self.to_json()).map_err(|e| {
            DatabaseError::Query(format!(
                "document {}/{} does not match the expected shape: {e}",
                self.collection, self.id
            ))
        })
    }

    /// Deserialize into the typed entity of this collection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if the document is in another collection
    /// or its data does not fit `T`.
    pub fn into_entity<T: Entity>(self) -> Result<T, DatabaseError> {
        if self.collection != T::COLLECTION {
            return Err(DatabaseError::Query(format!(
                "document {}/{} is not a {}",
                self.collection,
                self.id,
                T::NAME
            )));
        }
        self.deserialize()
    }
}

/// Require a JSON object and drop the store-managed keys.
pub(crate) fn into_body(value: Value) -> Result<Map<String, Value>, DatabaseError> {
    match value {
        Value::Object(mut map) => {
            for key in MANAGED_FIELDS {
                map.remove(*key);
            }
            Ok(map)
        }
        other => Err(DatabaseError::Validation(format!(
            "document data must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Recursively merge `source` into `target`: nested objects merge key by
/// key, every other value replaces what was there.
pub fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Apply an update patch. Top-level keys replace their value; dotted keys
/// (`signature.envelope_status`) set a nested field, creating intermediate
/// objects as needed.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidFilter` for malformed dotted keys.
pub fn apply_patch(
    target: &mut Map<String, Value>,
    patch: Map<String, Value>,
) -> Result<(), DatabaseError> {
    for (key, value) in patch {
        if MANAGED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        if key.contains('.') {
            validate_field_path(&key)?;
            set_path(target, &key, value);
        } else {
            target.insert(key, value);
        }
    }
    Ok(())
}

fn set_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = target;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
}

fn lookup<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
