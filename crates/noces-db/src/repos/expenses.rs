//! Expense repository and expense totals.

use noces_core::entities::Expense;
use noces_core::errors::CoreError;
use noces_core::responses::ExpenseTotal;
use noces_core::validation::{require_non_blank, validate_expense_amount};
use serde_json::Value;

use super::{to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::expense::{ExpenseUpdate, NewExpense};

/// What an expense total is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseScope<'a> {
    Event(&'a str),
    Client(&'a str),
}

impl<'a> ExpenseScope<'a> {
    const fn field(self) -> &'static str {
        match self {
            Self::Event(_) => "event_id",
            Self::Client(_) => "client_id",
        }
    }

    const fn kind(self) -> &'static str {
        match self {
            Self::Event(_) => "event",
            Self::Client(_) => "client",
        }
    }

    const fn id(self) -> &'a str {
        match self {
            Self::Event(id) | Self::Client(id) => id,
        }
    }
}

fn validate_expense(expense: &Expense) -> Result<(), CoreError> {
    require_non_blank("label", &expense.label)?;
    validate_expense_amount(expense.amount_cents)
}

impl NocesService {
    /// Record an expense. Non-positive amounts are rejected before any write.
    pub async fn create_expense(&self, input: NewExpense) -> Result<Expense, DatabaseError> {
        validate_expense_amount(input.amount_cents)?;
        require_non_blank("label", &input.label)?;
        let body = to_body(&input)?;
        self.create_entity(Value::Object(body)).await
    }

    pub async fn get_expense(&self, id: &str) -> Result<Expense, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_expenses(&self, query: &Query) -> Result<Vec<Expense>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_expense(
        &self,
        id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense, DatabaseError> {
        if let Some(amount) = update.amount_cents {
            validate_expense_amount(amount)?;
        }
        self.patch_entity(id, to_patch(&update)?, validate_expense)
            .await
    }

    pub async fn delete_expense(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Expense>(id).await
    }

    /// Sum of expenses attached to an event or a client.
    pub async fn expense_total(&self, scope: ExpenseScope<'_>) -> Result<ExpenseTotal, DatabaseError> {
        let expenses = self
            .list_expenses(&Query::new().where_eq(scope.field(), scope.id()))
            .await?;

        let mut total = ExpenseTotal {
            scope: scope.kind().to_string(),
            scope_id: scope.id().to_string(),
            count: 0,
            total_cents: 0,
            paid_cents: 0,
        };
        for expense in &expenses {
            total.count += 1;
            total.total_cents = total
                .total_cents
                .checked_add(expense.amount_cents)
                .ok_or_else(|| DatabaseError::Validation("expense total overflows".into()))?;
            if expense.paid {
                total.paid_cents = total
                    .paid_cents
                    .checked_add(expense.amount_cents)
                    .ok_or_else(|| DatabaseError::Validation("paid expense total overflows".into()))?;
            }
        }
        Ok(total)
    }
}
