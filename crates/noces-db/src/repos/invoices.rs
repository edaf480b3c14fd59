//! Invoice repository: totals, payments, payment links and reconciliation.

use chrono::Utc;
use noces_core::entities::{Entity, Invoice, items_total};
use noces_core::enums::{InvoiceStatus, PaymentLinkStatus};
use noces_core::errors::CoreError;
use noces_core::sync::InvoicePaymentPatch;
use noces_core::validation::{
    require_non_blank, resolve_total, validate_line_items, validate_paid_amount,
};
use serde_json::{Value, json};

use super::{invalid_transition, to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::{FilterOp, Query};
use crate::service::NocesService;
use crate::updates::invoice::{InvoiceUpdate, NewInvoice};

fn validate_invoice(invoice: &Invoice) -> Result<(), CoreError> {
    require_non_blank("number", &invoice.number)?;
    validate_line_items(&invoice.items)?;
    resolve_total(&invoice.items, Some(invoice.total_cents))?;
    validate_paid_amount(invoice.total_cents, invoice.paid_cents)
}

impl NocesService {
    /// Create a draft invoice. The total is derived from the line items
    /// when there are any.
    pub async fn create_invoice(&self, input: NewInvoice) -> Result<Invoice, DatabaseError> {
        require_non_blank("number", &input.number)?;
        require_non_blank("client_id", &input.client_id)?;
        validate_line_items(&input.items)?;
        let total = resolve_total(&input.items, input.total_cents)?;

        let mut body = to_body(&input)?;
        body.insert("total_cents".into(), json!(total));
        body.insert("paid_cents".into(), json!(0));
        body.insert("status".into(), serde_json::to_value(InvoiceStatus::Draft)?);
        let invoice: Invoice = self.create_entity(Value::Object(body)).await?;
        tracing::debug!(id = %invoice.id, total_cents = total, "invoice created");
        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Invoice, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_invoices(&self, query: &Query) -> Result<Vec<Invoice>, DatabaseError> {
        self.list_entities(query).await
    }

    /// Update an invoice. New items without an explicit total recompute the
    /// total; the result must still satisfy `paid <= total`.
    pub async fn update_invoice(
        &self,
        id: &str,
        mut update: InvoiceUpdate,
    ) -> Result<Invoice, DatabaseError> {
        if let Some(items) = &update.items {
            validate_line_items(items)?;
            if update.total_cents.is_none() && !items.is_empty() {
                update.total_cents = Some(
                    items_total(items)
                        .ok_or_else(|| DatabaseError::Validation("line item total overflows".into()))?,
                );
            }
        }
        self.patch_entity(id, to_patch(&update)?, validate_invoice)
            .await
    }

    pub async fn delete_invoice(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Invoice>(id).await
    }

    /// Move an invoice along its state machine. Marking an invoice paid by
    /// hand settles the remaining amount.
    pub async fn transition_invoice(
        &self,
        id: &str,
        status: InvoiceStatus,
    ) -> Result<Invoice, DatabaseError> {
        self.modify_entity(id, |invoice: &mut Invoice| {
            if !invoice.status.can_transition_to(status) {
                return Err(invalid_transition(Invoice::NAME, id, invoice.status, status));
            }
            if status == InvoiceStatus::Paid {
                invoice.paid_cents = invoice.total_cents;
                invoice.paid_at.get_or_insert_with(Utc::now);
            }
            invoice.status = status;
            Ok(())
        })
        .await
    }

    /// Record a payment received outside a payment link.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for non-positive amounts, invoices
    /// not awaiting payment, and payments exceeding the remaining amount.
    pub async fn record_payment(&self, id: &str, amount_cents: i64) -> Result<Invoice, DatabaseError> {
        if amount_cents <= 0 {
            return Err(DatabaseError::Validation(format!(
                "payment amount must be positive, got {amount_cents} cents"
            )));
        }
        self.modify_entity(id, |invoice: &mut Invoice| {
            if !invoice.status.awaits_payment() {
                return Err(DatabaseError::Validation(format!(
                    "invoice {id} is {}, not awaiting payment",
                    invoice.status
                )));
            }
            let remaining = invoice.remaining_cents();
            if amount_cents > remaining {
                return Err(DatabaseError::Validation(format!(
                    "payment of {amount_cents} exceeds the remaining {remaining} cents"
                )));
            }
            invoice.paid_cents += amount_cents;
            if invoice.paid_cents == invoice.total_cents {
                invoice.status = InvoiceStatus::Paid;
                invoice.paid_at = Some(Utc::now());
            } else {
                invoice.status = InvoiceStatus::PartiallyPaid;
            }
            Ok(())
        })
        .await
    }

    /// Point the invoice at a payment link. A new link records the amount
    /// already paid, which its payments are added to.
    pub async fn attach_payment_link(
        &self,
        id: &str,
        link_id: &str,
        url: &str,
        status: Option<PaymentLinkStatus>,
    ) -> Result<Invoice, DatabaseError> {
        self.modify_entity(id, |invoice: &mut Invoice| {
            if invoice.qonto_payment_link_id.as_deref() != Some(link_id) {
                invoice.paid_before_link_cents = invoice.paid_cents;
            }
            invoice.qonto_payment_link_id = Some(link_id.to_string());
            invoice.payment_link_url = Some(url.to_string());
            invoice.payment_link_status = status.or(Some(PaymentLinkStatus::Open));
            Ok(())
        })
        .await
    }

    /// Write the payment state computed from the invoice's payment link.
    ///
    /// The paid amount never drops below what the stored invoice records, so
    /// a payment recorded since the patch was computed is kept.
    pub async fn apply_payment_reconciliation(
        &self,
        id: &str,
        patch: &InvoicePaymentPatch,
    ) -> Result<Invoice, DatabaseError> {
        self.modify_entity(id, |invoice: &mut Invoice| {
            let paid = invoice.paid_cents.max(patch.paid_cents);
            validate_paid_amount(invoice.total_cents, paid)?;
            invoice.paid_cents = paid;
            invoice.status = if invoice.status == InvoiceStatus::Paid
                || (paid > 0 && paid == invoice.total_cents)
            {
                InvoiceStatus::Paid
            } else if paid > 0 {
                InvoiceStatus::PartiallyPaid
            } else {
                patch.status
            };
            if patch.payment_link_status.is_some() {
                invoice.payment_link_status = patch.payment_link_status;
            }
            if patch.paid_at.is_some() {
                invoice.paid_at = patch.paid_at;
            }
            if invoice.status == InvoiceStatus::Paid && invoice.paid_at.is_none() {
                invoice.paid_at = Some(Utc::now());
            }
            Ok(())
        })
        .await
    }

    /// Invoices with a payment link that are not settled yet.
    pub async fn list_invoices_awaiting_payment(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let query = Query::new()
            .where_op("status", FilterOp::In, json!(["sent", "partially_paid"]))
            .where_op("qonto_payment_link_id", FilterOp::NotEq, Value::Null);
        self.list_invoices(&query).await
    }
}
