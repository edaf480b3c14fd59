//! Row and value conversion helpers.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Parse a stored timestamp as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.000000Z"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Format a timestamp for storage.
///
/// Fixed-width UTC with microseconds, so lexicographic order equals
/// chronological order in `ORDER BY created_at`.
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a string into a serde-deserializable enum.
///
/// Works with all noces-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Validation` if the string does not match any variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Validation(format!("invalid value '{s}': {e}")))
}

/// Convert a JSON scalar into a SQL parameter.
///
/// Booleans bind as 0/1 (`SQLite` has no boolean type); arrays and objects
/// bind as their JSON text.
#[must_use]
pub fn json_to_sql(value: &serde_json::Value) -> libsql::Value {
    use serde_json::Value;
    match value {
        Value::Null => libsql::Value::Null,
        Value::Bool(b) => libsql::Value::Integer(i64::from(*b)),
        Value::Number(n) => n.as_i64().map_or_else(
            || libsql::Value::Real(n.as_f64().unwrap_or(f64::NAN)),
            libsql::Value::Integer,
        ),
        Value::String(s) => libsql::Value::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => libsql::Value::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noces_core::enums::InvoiceStatus;
    use serde_json::json;

    #[test]
    fn parses_both_datetime_formats() {
        let a = parse_datetime("2026-02-09T14:30:00.000000Z").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn format_is_sortable() {
        let early = parse_datetime("2026-02-09T14:30:00Z").unwrap();
        let late = parse_datetime("2026-02-09T14:30:00.5Z").unwrap();
        assert!(format_datetime(early) < format_datetime(late));
        assert_eq!(format_datetime(early), "2026-02-09T14:30:00.000000Z");
    }

    #[test]
    fn parse_enum_snake_case() {
        let status: InvoiceStatus = parse_enum("partially_paid").unwrap();
        assert_eq!(status, InvoiceStatus::PartiallyPaid);
        assert!(parse_enum::<InvoiceStatus>("refunded").is_err());
    }

    #[test]
    fn json_scalars_to_sql() {
        assert_eq!(json_to_sql(&json!(true)), libsql::Value::Integer(1));
        assert_eq!(json_to_sql(&json!(42)), libsql::Value::Integer(42));
        assert_eq!(json_to_sql(&json!(1.5)), libsql::Value::Real(1.5));
        assert_eq!(json_to_sql(&json!("a")), libsql::Value::Text("a".into()));
        assert_eq!(json_to_sql(&json!(null)), libsql::Value::Null);
        assert_eq!(
            json_to_sql(&json!(["a", 1])),
            libsql::Value::Text(r#"["a",1]"#.into())
        );
    }
}
