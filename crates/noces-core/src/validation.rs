//! Ad hoc invariants checked before any document write.
//!
//! The store itself is schema-less; these checks are applied by the typed
//! repositories on create and again on update (against the merged result).

use crate::entities::{CompositionItem, LineItem, items_total};
use crate::errors::CoreError;

/// Reject empty or whitespace-only required text.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the field.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Expenses must carry a strictly positive amount.
///
/// # Errors
///
/// Returns `CoreError::Validation` when `amount_cents <= 0`.
pub fn validate_expense_amount(amount_cents: i64) -> Result<(), CoreError> {
    if amount_cents <= 0 {
        return Err(CoreError::Validation(format!(
            "expense amount must be positive, got {amount_cents} cents"
        )));
    }
    Ok(())
}

/// Every line needs a label, a positive quantity and a non-negative price.
///
/// # Errors
///
/// Returns `CoreError::Validation` for the first offending line (1-based).
pub fn validate_line_items(items: &[LineItem]) -> Result<(), CoreError> {
    for (index, item) in items.iter().enumerate() {
        let line = index + 1;
        if item.label.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "line {line}: label must not be blank"
            )));
        }
        if item.quantity == 0 {
            return Err(CoreError::Validation(format!(
                "line {line}: quantity must be positive"
            )));
        }
        if item.unit_price_cents < 0 {
            return Err(CoreError::Validation(format!(
                "line {line}: unit price must not be negative"
            )));
        }
    }
    Ok(())
}

/// Resolve the document total: the sum of items when there are items,
/// otherwise the explicit total.
///
/// # Errors
///
/// Returns `CoreError::Validation` when an explicit total disagrees with the
/// items, when no total can be derived, or when the sum overflows.
pub fn resolve_total(items: &[LineItem], explicit_total: Option<i64>) -> Result<i64, CoreError> {
    if items.is_empty() {
        let total = explicit_total.ok_or_else(|| {
            CoreError::Validation("a total is required when there are no line items".into())
        })?;
        if total < 0 {
            return Err(CoreError::Validation(format!(
                "total must not be negative, got {total} cents"
            )));
        }
        return Ok(total);
    }

    let computed = items_total(items)
        .ok_or_else(|| CoreError::Validation("line item total overflows".into()))?;
    if let Some(total) = explicit_total
        && total != computed
    {
        return Err(CoreError::Validation(format!(
            "total {total} does not match the sum of line items {computed}"
        )));
    }
    Ok(computed)
}

/// `0 <= paid <= total`.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the paid amount is negative or
/// exceeds the total.
pub fn validate_paid_amount(total_cents: i64, paid_cents: i64) -> Result<(), CoreError> {
    if paid_cents < 0 {
        return Err(CoreError::Validation(format!(
            "paid amount must not be negative, got {paid_cents} cents"
        )));
    }
    if paid_cents > total_cents {
        return Err(CoreError::Validation(format!(
            "paid amount {paid_cents} exceeds invoice total {total_cents}"
        )));
    }
    Ok(())
}

/// Composition items need an article and a positive quantity.
///
/// # Errors
///
/// Returns `CoreError::Validation` for the first offending item.
pub fn validate_composition_items(items: &[CompositionItem]) -> Result<(), CoreError> {
    for item in items {
        require_non_blank("article_id", &item.article_id)?;
        if item.quantity == 0 {
            return Err(CoreError::Validation(format!(
                "quantity of article {} must be positive",
                item.article_id
            )));
        }
    }
    Ok(())
}

/// Minimal shape check: one `@` with text on both sides and a dot in the domain.
///
/// # Errors
///
/// Returns `CoreError::Validation` for malformed addresses.
pub fn validate_email(field: &str, email: &str) -> Result<(), CoreError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "{field} is not a valid email address: '{email}'"
        )));
    }
    Ok(())
}

/// Unit prices are never negative.
///
/// # Errors
///
/// Returns `CoreError::Validation` on a negative price.
pub fn validate_unit_price(unit_price_cents: i64) -> Result<(), CoreError> {
    if unit_price_cents < 0 {
        return Err(CoreError::Validation(format!(
            "unit price must not be negative, got {unit_price_cents} cents"
        )));
    }
    Ok(())
}

/// Apply a signed stock adjustment.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the result would be negative or
/// does not fit in the stock counter.
pub fn apply_stock_delta(stock: u32, delta: i64) -> Result<u32, CoreError> {
    let next = i64::from(stock)
        .checked_add(delta)
        .ok_or_else(|| CoreError::Validation("stock adjustment overflows".into()))?;
    if next < 0 {
        return Err(CoreError::Validation(format!(
            "insufficient stock: {stock} available, adjustment of {delta}"
        )));
    }
    u32::try_from(next)
        .map_err(|_| CoreError::Validation(format!("stock {next} exceeds the maximum")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(label: &str, quantity: u32, unit_price_cents: i64) -> LineItem {
        LineItem {
            label: label.into(),
            quantity,
            unit_price_cents,
        }
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn non_positive_expense_rejected(#[case] amount: i64) {
        assert!(validate_expense_amount(amount).is_err());
    }

    #[test]
    fn positive_expense_accepted() {
        assert!(validate_expense_amount(1).is_ok());
    }

    #[test]
    fn blank_text_rejected() {
        let err = require_non_blank("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: name must not be blank");
        assert!(require_non_blank("name", "Alice & Bob").is_ok());
    }

    #[test]
    fn line_item_rules() {
        assert!(validate_line_items(&[line("Flowers", 1, 0)]).is_ok());
        assert!(validate_line_items(&[line("Flowers", 0, 100)]).is_err());
        assert!(validate_line_items(&[line("Flowers", 1, -1)]).is_err());
        let err = validate_line_items(&[line("ok", 1, 1), line(" ", 1, 1)]).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn total_derived_from_items() {
        let items = [line("Venue", 1, 500_000), line("Chairs", 100, 350)];
        assert_eq!(resolve_total(&items, None).unwrap(), 535_000);
        assert_eq!(resolve_total(&items, Some(535_000)).unwrap(), 535_000);
        assert!(resolve_total(&items, Some(1)).is_err());
    }

    #[test]
    fn total_required_without_items() {
        assert!(resolve_total(&[], None).is_err());
        assert!(resolve_total(&[], Some(-5)).is_err());
        assert_eq!(resolve_total(&[], Some(12_000)).unwrap(), 12_000);
    }

    #[rstest]
    #[case(1000, 0, true)]
    #[case(1000, 1000, true)]
    #[case(1000, 1001, false)]
    #[case(1000, -1, false)]
    fn paid_within_total(#[case] total: i64, #[case] paid: i64, #[case] ok: bool) {
        assert_eq!(validate_paid_amount(total, paid).is_ok(), ok);
    }

    #[rstest]
    #[case("anna@example.com", true)]
    #[case("a.b+c@mail.example.fr", true)]
    #[case("anna", false)]
    #[case("anna@", false)]
    #[case("@example.com", false)]
    #[case("anna@example", false)]
    #[case("an na@example.com", false)]
    #[case("a@b@example.com", false)]
    fn email_shapes(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email("email", email).is_ok(), ok, "{email}");
    }

    #[test]
    fn stock_never_negative() {
        assert_eq!(apply_stock_delta(5, -5).unwrap(), 0);
        assert_eq!(apply_stock_delta(5, 3).unwrap(), 8);
        let err = apply_stock_delta(5, -6).unwrap_err();
        assert!(err.to_string().contains("insufficient stock"));
        assert!(apply_stock_delta(u32::MAX, 1).is_err());
    }

    #[test]
    fn composition_items_need_positive_quantity() {
        let ok = CompositionItem {
            article_id: "art-1".into(),
            quantity: 2,
        };
        let zero = CompositionItem {
            article_id: "art-2".into(),
            quantity: 0,
        };
        assert!(validate_composition_items(&[ok.clone()]).is_ok());
        assert!(validate_composition_items(&[ok, zero]).is_err());
    }
}
