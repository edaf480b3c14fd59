use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use noces_core::entities::{CompositionItem, LineItem};
use noces_core::money::parse_cents;
use noces_db::query::{Direction, Filter, Query};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cli::subcommands::ListArgs;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a decimal amount (`"1250.50"`, `"1 250,50"`) into cents.
pub fn parse_amount(raw: &str, field: &str) -> anyhow::Result<i64> {
    parse_cents(raw).with_context(|| format!("invalid {field}"))
}

/// Interpret an optional update flag: absent leaves the field alone, an
/// empty value clears it, anything else is parsed.
pub fn clearable<T>(
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> anyhow::Result<T>,
) -> anyhow::Result<Option<Option<T>>> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(value) => parse(value).map(|parsed| Some(Some(parsed))),
    }
}

/// [`clearable`] for free text.
pub fn clearable_text(raw: Option<&str>) -> Option<Option<String>> {
    match raw.map(str::trim) {
        None => None,
        Some("") => Some(None),
        Some(value) => Some(Some(value.to_string())),
    }
}

pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid {field} '{raw}' (expected YYYY-MM-DD)"))
}

/// Parse `label:quantity:unit price`. The label may itself contain `:`.
pub fn parse_line_item(raw: &str) -> anyhow::Result<LineItem> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(label)) = (parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!("invalid item '{raw}' (expected label:quantity:unit price)");
    };
    let label = label.trim();
    if label.is_empty() {
        anyhow::bail!("invalid item '{raw}': label is empty");
    }
    let quantity = quantity
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid item '{raw}': quantity"))?;
    Ok(LineItem {
        label: label.to_string(),
        quantity,
        unit_price_cents: parse_amount(price, "item unit price")?,
    })
}

pub fn parse_line_items(raw: &[String]) -> anyhow::Result<Vec<LineItem>> {
    raw.iter().map(|item| parse_line_item(item)).collect()
}

/// Parse `article_id[:quantity]`; the quantity defaults to 1.
pub fn parse_composition_item(raw: &str) -> anyhow::Result<CompositionItem> {
    let (article_id, quantity) = match raw.rsplit_once(':') {
        Some((id, quantity)) => (
            id,
            quantity
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid article '{raw}': quantity"))?,
        ),
        None => (raw, 1),
    };
    let article_id = article_id.trim();
    if article_id.is_empty() {
        anyhow::bail!("invalid article '{raw}': article id is empty");
    }
    Ok(CompositionItem {
        article_id: article_id.to_string(),
        quantity,
    })
}

/// Fail when an update would not change anything.
pub fn require_changes<T: Serialize>(update: &T, flags: &str) -> anyhow::Result<()> {
    let body = serde_json::to_value(update)?;
    if body.as_object().is_none_or(serde_json::Map::is_empty) {
        anyhow::bail!("at least one of {flags} must be provided");
    }
    Ok(())
}

/// Read a JSON document body given inline or as `@path`.
pub fn read_json_data(raw: &str) -> anyhow::Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("failed to read {path}"))?,
        None => raw.to_string(),
    };
    let value: Value = serde_json::from_str(&text).context("--data is not valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("--data must be a JSON object");
    }
    Ok(value)
}

/// Build a store query from `--where`, `--order-by` and the effective limit.
pub fn build_query(list: &ListArgs, limit: Option<u32>) -> anyhow::Result<Query> {
    let mut query = Query::new();
    for raw in &list.filters {
        query = query.filter(Filter::parse(raw)?);
    }
    if let Some(field) = list.order_by.as_deref() {
        let direction = if list.asc {
            Direction::Asc
        } else {
            Direction::Desc
        };
        query = query.order_by(field, direction);
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use noces_core::enums::{InvoiceStatus, TaskPriority};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let status: InvoiceStatus = parse_enum("partially-paid", "status").expect("status should parse");
        assert_eq!(status, InvoiceStatus::PartiallyPaid);
        let priority: TaskPriority = parse_enum("high", "priority").expect("priority should parse");
        assert_eq!(priority, TaskPriority::High);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<InvoiceStatus>("settled", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'settled'"));
    }

    #[test]
    fn clearable_distinguishes_absent_empty_and_value() {
        assert_eq!(clearable_text(None), None);
        assert_eq!(clearable_text(Some("  ")), Some(None));
        assert_eq!(clearable_text(Some("Lyon")), Some(Some("Lyon".to_string())));

        let budget = clearable(Some("1 500"), |raw| parse_amount(raw, "budget")).expect("amount");
        assert_eq!(budget, Some(Some(150_000)));
        let cleared = clearable(Some(""), |raw| parse_amount(raw, "budget")).expect("cleared");
        assert_eq!(cleared, Some(None));
    }

    #[test]
    fn require_changes_rejects_empty_update() {
        let empty = serde_json::json!({});
        let err = require_changes(&empty, "--name").expect_err("should fail");
        assert_eq!(err.to_string(), "at least one of --name must be provided");
        assert!(require_changes(&serde_json::json!({ "name": "x" }), "--name").is_ok());
    }

    #[test]
    fn line_item_label_may_contain_colons() {
        let item = parse_line_item("Vin: Bordeaux:12:18,50").expect("item should parse");
        assert_eq!(
            item,
            LineItem {
                label: "Vin: Bordeaux".into(),
                quantity: 12,
                unit_price_cents: 1850,
            }
        );
    }

    #[test]
    fn line_item_requires_three_parts() {
        assert!(parse_line_item("Fleurs:200").is_err());
        assert!(parse_line_item(":1:200").is_err());
        assert!(parse_line_item("Fleurs:many:200").is_err());
    }

    #[test]
    fn composition_item_defaults_to_one() {
        let item = parse_composition_item("art-1a2b3c4d").expect("item should parse");
        assert_eq!(item.quantity, 1);
        let item = parse_composition_item("art-1a2b3c4d:6").expect("item should parse");
        assert_eq!(item.article_id, "art-1a2b3c4d");
        assert_eq!(item.quantity, 6);
    }

    #[test]
    fn json_data_inline_and_from_file() {
        let inline = read_json_data(r#"{"name":"Camille"}"#).expect("inline json");
        assert_eq!(inline["name"], "Camille");

        let temp = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(temp.path(), r#"{"status":"lead"}"#).expect("write");
        let from_file =
            read_json_data(&format!("@{}", temp.path().display())).expect("file json");
        assert_eq!(from_file["status"], "lead");

        assert!(read_json_data("[1,2]").is_err());
        assert!(read_json_data("{not json").is_err());
    }

    #[test]
    fn query_orders_descending_unless_asc() {
        let list = ListArgs {
            filters: vec!["status == sent".into()],
            order_by: Some("due_date".into()),
            asc: false,
        };
        let query = build_query(&list, Some(10)).expect("query should build");
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.order_by, Some(("due_date".to_string(), Direction::Desc)));
        assert_eq!(query.limit, Some(10));

        let bad = ListArgs {
            filters: vec!["status".into()],
            ..ListArgs::default()
        };
        assert!(build_query(&bad, None).is_err());
    }
}
