//! Firestore-style queries over JSON documents.
//!
//! A [`Query`] is a conjunction of [`Filter`]s (`field op value`), an optional
//! ordering and a limit. Filters compile to `SQLite` JSON functions
//! (`json_type`, `json_extract`, `json_each`) with every operand bound as a
//! parameter.
//!
//! Matching follows Firestore semantics:
//! - a document missing the field never matches, for any operator (`!=` and
//!   `not-in` included);
//! - comparisons are type-strict: numbers only match numbers, strings only
//!   strings, booleans only booleans;
//! - ordering on a data field excludes documents where the field is missing.

use std::fmt;
use std::str::FromStr;

use noces_core::collections::Collection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::json_kind;
use crate::error::DatabaseError;
use crate::helpers::json_to_sql;

/// Maximum number of operands for `in`, `not-in` and `array-contains-any`.
pub const MAX_DISJUNCTION: usize = 30;

/// Columns addressable by name in filters and ordering.
const COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not-in")]
    NotIn,
    #[serde(rename = "array-contains")]
    ArrayContains,
    #[serde(rename = "array-contains-any")]
    ArrayContainsAny,
}

impl FilterOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::NotIn => "not-in",
            Self::ArrayContains => "array-contains",
            Self::ArrayContainsAny => "array-contains-any",
        }
    }

    const fn sql_comparison(self) -> Option<&'static str> {
        match self {
            Self::Lt => Some("<"),
            Self::Lte => Some("<="),
            Self::Gt => Some(">"),
            Self::Gte => Some(">="),
            _ => None,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "==" | "=" => Self::Eq,
            "!=" | "<>" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "in" => Self::In,
            "not-in" => Self::NotIn,
            "array-contains" => Self::ArrayContains,
            "array-contains-any" => Self::ArrayContainsAny,
            _ => return Err(DatabaseError::InvalidFilter(format!("unknown operator '{s}'"))),
        };
        Ok(op)
    }
}

/// One `field op value` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Parse a `"field op value"` expression, e.g. `status == sent`,
    /// `total_cents >= 10000`, `status in ["sent", "partially_paid"]`.
    ///
    /// The value is read as JSON when it parses, otherwise as a bare string.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidFilter` if the expression does not have
    /// three parts or the operator is unknown.
    pub fn parse(expr: &str) -> Result<Self, DatabaseError> {
        let malformed =
            || DatabaseError::InvalidFilter(format!("expected 'field op value', got '{expr}'"));

        let (field, rest) = expr.trim().split_once(char::is_whitespace).ok_or_else(malformed)?;
        let (op, raw_value) = rest
            .trim_start()
            .split_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        let raw_value = raw_value.trim();
        if raw_value.is_empty() {
            return Err(malformed());
        }

        let value = serde_json::from_str(raw_value)
            .unwrap_or_else(|_| Value::String(raw_value.to_string()));
        Ok(Self::new(field, op.parse()?, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(DatabaseError::InvalidFilter(format!(
                "unknown direction '{s}' (expected asc or desc)"
            ))),
        }
    }
}

/// Filters, ordering and limit for `get_documents`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<u32>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn where_op(self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filter(Filter::new(field, op, value))
    }

    #[must_use]
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(field, value))
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Validate a dotted field path: non-empty segments of `[A-Za-z0-9_]`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidFilter` describing the problem.
pub fn validate_field_path(field: &str) -> Result<(), DatabaseError> {
    if field.is_empty() {
        return Err(DatabaseError::InvalidFilter("empty field path".into()));
    }
    for segment in field.split('.') {
        if segment.is_empty() {
            return Err(DatabaseError::InvalidFilter(format!(
                "empty segment in field path '{field}'"
            )));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DatabaseError::InvalidFilter(format!(
                "invalid character in field path '{field}'"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SQL compilation
// ---------------------------------------------------------------------------

/// A SQL fragment with its positional (`?`) parameters, in order.
#[derive(Debug, Default)]
pub(crate) struct Fragment {
    pub sql: String,
    pub params: Vec<libsql::Value>,
}

impl Fragment {
    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn bind(&mut self, value: libsql::Value) {
        self.sql.push('?');
        self.params.push(value);
    }

    fn append(&mut self, other: Self) {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params);
    }
}

enum FieldRef {
    Column(&'static str),
    /// JSON path, e.g. `$.signature.envelope_id`.
    Path(String),
}

fn resolve_field(field: &str) -> Result<FieldRef, DatabaseError> {
    if let Some(column) = COLUMNS.iter().find(|c| **c == field) {
        return Ok(FieldRef::Column(column));
    }
    validate_field_path(field)?;
    Ok(FieldRef::Path(format!("$.{field}")))
}

/// Compile filters, ordering and limit into `WHERE ... ORDER BY ... LIMIT`
/// clauses (without the leading `WHERE` keyword). `scope` filters are
/// prepended to the query's own filters.
pub(crate) fn compile(
    collection: Collection,
    query: &Query,
    scope: &[Filter],
) -> Result<Fragment, DatabaseError> {
    let mut out = Fragment::default();
    out.push("collection = ");
    out.bind(libsql::Value::Text(collection.as_str().to_string()));
    for filter in scope.iter().chain(&query.filters) {
        out.push(" AND ");
        out.append(compile_filter(filter)?);
    }

    match &query.order_by {
        None => out.push(" ORDER BY created_at DESC, id ASC"),
        Some((field, direction)) => match resolve_field(field)? {
            FieldRef::Column(column) => {
                out.push(&format!(" ORDER BY {column} {}, id ASC", direction.sql()));
            }
            FieldRef::Path(path) => {
                // Path is validated to [A-Za-z0-9_.$], safe to inline.
                out.push(" AND json_type(data, ");
                out.bind(libsql::Value::Text(path.clone()));
                out.push(") IS NOT NULL");
                out.push(&format!(
                    " ORDER BY json_extract(data, '{path}') {}, id ASC",
                    direction.sql()
                ));
            }
        },
    }

    if let Some(limit) = query.limit {
        out.push(" LIMIT ");
        out.bind(libsql::Value::Integer(i64::from(limit)));
    }
    Ok(out)
}

fn compile_filter(filter: &Filter) -> Result<Fragment, DatabaseError> {
    match resolve_field(&filter.field)? {
        FieldRef::Column(column) => compile_column_filter(column, filter),
        FieldRef::Path(path) => compile_path_filter(&path, filter),
    }
}

fn compile_column_filter(column: &str, filter: &Filter) -> Result<Fragment, DatabaseError> {
    let text = |value: &Value| -> Result<libsql::Value, DatabaseError> {
        value.as_str().map(|s| libsql::Value::Text(s.to_string())).ok_or_else(|| {
            DatabaseError::InvalidFilter(format!(
                "'{}' only compares with strings, got {}",
                filter.field,
                json_kind(value)
            ))
        })
    };

    let mut out = Fragment::default();
    match filter.op {
        FilterOp::Eq | FilterOp::NotEq => {
            let op = if filter.op == FilterOp::Eq { "=" } else { "<>" };
            out.push(&format!("{column} {op} "));
            out.bind(text(&filter.value)?);
        }
        FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            let op = filter.op.sql_comparison().unwrap_or("=");
            out.push(&format!("{column} {op} "));
            out.bind(text(&filter.value)?);
        }
        FilterOp::In | FilterOp::NotIn => {
            let values = operand_list(filter)?;
            let keyword = if filter.op == FilterOp::In { "IN" } else { "NOT IN" };
            out.push(&format!("{column} {keyword} ("));
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    out.push(", ");
                }
                out.bind(text(value)?);
            }
            out.push(")");
        }
        FilterOp::ArrayContains | FilterOp::ArrayContainsAny => {
            return Err(DatabaseError::InvalidFilter(format!(
                "'{}' is not an array field",
                filter.field
            )));
        }
    }
    Ok(out)
}

fn compile_path_filter(path: &str, filter: &Filter) -> Result<Fragment, DatabaseError> {
    let mut out = Fragment::default();
    match filter.op {
        FilterOp::Eq => out.append(path_equals(path, &filter.value)),
        FilterOp::NotEq => {
            out.append(path_present(path));
            out.push(" AND NOT ");
            out.append(path_equals(path, &filter.value));
            out = wrap(out);
        }
        FilterOp::Lt | FilterOp::Lte | FilterOp::Gt | FilterOp::Gte => {
            let op = filter.op.sql_comparison().unwrap_or("=");
            out.append(path_compare(path, op, filter)?);
        }
        FilterOp::In => {
            let values = operand_list(filter)?;
            out.append(any_of(values.iter().map(|v| path_equals(path, v))));
        }
        FilterOp::NotIn => {
            let values = operand_list(filter)?;
            out.append(path_present(path));
            out.push(" AND NOT ");
            out.append(any_of(values.iter().map(|v| path_equals(path, v))));
            out = wrap(out);
        }
        FilterOp::ArrayContains => {
            out.append(array_contains(path, std::slice::from_ref(&filter.value)));
        }
        FilterOp::ArrayContainsAny => {
            let values = operand_list(filter)?;
            out.append(array_contains(path, values));
        }
    }
    Ok(out)
}

fn operand_list(filter: &Filter) -> Result<&[Value], DatabaseError> {
    let Value::Array(values) = &filter.value else {
        return Err(DatabaseError::InvalidFilter(format!(
            "'{}' needs an array operand, got {}",
            filter.op,
            json_kind(&filter.value)
        )));
    };
    if values.is_empty() {
        return Err(DatabaseError::InvalidFilter(format!(
            "'{}' needs at least one value",
            filter.op
        )));
    }
    if values.len() > MAX_DISJUNCTION {
        return Err(DatabaseError::InvalidFilter(format!(
            "'{}' accepts at most {MAX_DISJUNCTION} values, got {}",
            filter.op,
            values.len()
        )));
    }
    Ok(values)
}

fn path_param(path: &str) -> libsql::Value {
    libsql::Value::Text(path.to_string())
}

/// Field exists and is not JSON `null`. A missing field yields SQL NULL,
/// which is falsy in every context it is combined in.
fn path_present(path: &str) -> Fragment {
    let mut out = Fragment::default();
    out.push("json_type(data, ");
    out.bind(path_param(path));
    out.push(") <> 'null'");
    out
}

fn path_equals(path: &str, value: &Value) -> Fragment {
    let mut out = Fragment::default();
    match value {
        Value::Null => {
            out.push("json_type(data, ");
            out.bind(path_param(path));
            out.push(") = 'null'");
        }
        Value::Bool(b) => {
            out.push("json_type(data, ");
            out.bind(path_param(path));
            out.push(if *b { ") = 'true'" } else { ") = 'false'" });
        }
        Value::Number(_) | Value::String(_) => {
            out.push("(json_type(data, ");
            out.bind(path_param(path));
            out.push(") IN ");
            out.push(sql_types(value));
            out.push(" AND json_extract(data, ");
            out.bind(path_param(path));
            out.push(") = ");
            out.bind(json_to_sql(value));
            out.push(")");
        }
        Value::Array(_) | Value::Object(_) => {
            out.push("(json_type(data, ");
            out.bind(path_param(path));
            out.push(") IN ");
            out.push(sql_types(value));
            out.push(" AND json(json_extract(data, ");
            out.bind(path_param(path));
            out.push(")) = json(");
            out.bind(json_to_sql(value));
            out.push("))");
        }
    }
    out
}

fn path_compare(path: &str, op: &str, filter: &Filter) -> Result<Fragment, DatabaseError> {
    if !matches!(filter.value, Value::Number(_) | Value::String(_)) {
        return Err(DatabaseError::InvalidFilter(format!(
            "'{}' needs a number or string operand, got {}",
            filter.op,
            json_kind(&filter.value)
        )));
    }
    let mut out = Fragment::default();
    out.push("(json_type(data, ");
    out.bind(path_param(path));
    out.push(") IN ");
    out.push(sql_types(&filter.value));
    out.push(" AND json_extract(data, ");
    out.bind(path_param(path));
    out.push(&format!(") {op} "));
    out.bind(json_to_sql(&filter.value));
    out.push(")");
    Ok(out)
}

fn array_contains(path: &str, values: &[Value]) -> Fragment {
    let mut out = Fragment::default();
    out.push("(json_type(data, ");
    out.bind(path_param(path));
    out.push(") = 'array' AND EXISTS (SELECT 1 FROM json_each(documents.data, ");
    out.bind(path_param(path));
    out.push(") AS e WHERE ");
    out.append(any_of(values.iter().map(element_equals)));
    out.push("))");
    out
}

fn element_equals(value: &Value) -> Fragment {
    let mut out = Fragment::default();
    match value {
        Value::Null => out.push("e.type = 'null'"),
        Value::Bool(true) => out.push("e.type = 'true'"),
        Value::Bool(false) => out.push("e.type = 'false'"),
        Value::Number(_) | Value::String(_) => {
            out.push("(e.type IN ");
            out.push(sql_types(value));
            out.push(" AND e.atom = ");
            out.bind(json_to_sql(value));
            out.push(")");
        }
        Value::Array(_) | Value::Object(_) => {
            out.push("(e.type IN ");
            out.push(sql_types(value));
            out.push(" AND json(e.value) = json(");
            out.bind(json_to_sql(value));
            out.push("))");
        }
    }
    out
}

/// `json_type` names a JSON value can have.
const fn sql_types(value: &Value) -> &'static str {
    match value {
        Value::Null => "('null')",
        Value::Bool(_) => "('true', 'false')",
        Value::Number(_) => "('integer', 'real')",
        Value::String(_) => "('text')",
        Value::Array(_) => "('array')",
        Value::Object(_) => "('object')",
    }
}

fn any_of(parts: impl Iterator<Item = Fragment>) -> Fragment {
    let mut out = Fragment::default();
    out.push("(");
    for (index, part) in parts.enumerate() {
        if index > 0 {
            out.push(" OR ");
        }
        out.append(part);
    }
    out.push(")");
    out
}

fn wrap(inner: Fragment) -> Fragment {
    let mut out = Fragment::default();
    out.push("(");
    out.append(inner);
    out.push(")");
    out
}
