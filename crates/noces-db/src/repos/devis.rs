//! Devis (quote) repository: transitions, signature tracking and conversion
//! into an invoice.

use noces_core::collections::Collection;
use noces_core::entities::{Devis, Entity, Invoice, SignatureTracking, items_total};
use noces_core::enums::{DevisStatus, InvoiceStatus};
use noces_core::errors::CoreError;
use noces_core::responses::DevisConversion;
use noces_core::sync::DevisSignaturePatch;
use noces_core::validation::{require_non_blank, resolve_total, validate_line_items};
use serde_json::{Value, json};

use super::{invalid_transition, to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::{FilterOp, Query};
use crate::service::{NocesService, fetch, finish, insert, write};
use crate::updates::devis::{DevisUpdate, NewDevis};

fn validate_devis(devis: &Devis) -> Result<(), CoreError> {
    require_non_blank("number", &devis.number)?;
    validate_line_items(&devis.items)?;
    resolve_total(&devis.items, Some(devis.total_cents))?;
    Ok(())
}

/// Invoice number given to a converted devis when none is supplied.
fn default_invoice_number(devis_number: &str) -> String {
    format!("F-{devis_number}")
}

impl NocesService {
    pub async fn create_devis(&self, input: NewDevis) -> Result<Devis, DatabaseError> {
        require_non_blank("number", &input.number)?;
        require_non_blank("client_id", &input.client_id)?;
        validate_line_items(&input.items)?;
        let total = resolve_total(&input.items, input.total_cents)?;

        let mut body = to_body(&input)?;
        body.insert("total_cents".into(), json!(total));
        body.insert("status".into(), serde_json::to_value(DevisStatus::Draft)?);
        self.create_entity(Value::Object(body)).await
    }

    pub async fn get_devis(&self, id: &str) -> Result<Devis, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_devis(&self, query: &Query) -> Result<Vec<Devis>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_devis(&self, id: &str, mut update: DevisUpdate) -> Result<Devis, DatabaseError> {
        if let Some(items) = &update.items {
            validate_line_items(items)?;
            if update.total_cents.is_none() && !items.is_empty() {
                update.total_cents = Some(
                    items_total(items)
                        .ok_or_else(|| DatabaseError::Validation("line item total overflows".into()))?,
                );
            }
        }
        self.patch_entity(id, to_patch(&update)?, validate_devis)
            .await
    }

    pub async fn delete_devis(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Devis>(id).await
    }

    pub async fn transition_devis(&self, id: &str, status: DevisStatus) -> Result<Devis, DatabaseError> {
        self.modify_entity(id, |devis: &mut Devis| {
            if !devis.status.can_transition_to(status) {
                return Err(invalid_transition(Devis::NAME, id, devis.status, status));
            }
            devis.status = status;
            Ok(())
        })
        .await
    }

    /// Turn an accepted devis into a draft invoice with the same items.
    ///
    /// Both writes happen in one transaction: the invoice carries
    /// `devis_id`, the devis gets `invoice_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the devis is not accepted or
    /// was already converted.
    pub async fn convert_devis_to_invoice(
        &self,
        id: &str,
        invoice_number: Option<&str>,
    ) -> Result<DevisConversion, DatabaseError> {
        self.ensure_writable(Collection::Invoices)?;
        if let Some(number) = invoice_number {
            require_non_blank("number", number)?;
        }

        let tx = self.db().conn().transaction().await?;
        let result = async {
            let doc = fetch(&tx, Collection::Devis, id)
                .await?
                .filter(|doc| self.is_visible(doc))
                .ok_or_else(|| DatabaseError::not_found(Devis::NAME, id))?;
            let devis: Devis = doc.deserialize()?;

            if devis.status != DevisStatus::Accepted {
                return Err(DatabaseError::Validation(format!(
                    "only accepted devis can be converted, {id} is {}",
                    devis.status
                )));
            }
            if let Some(invoice_id) = &devis.invoice_id {
                return Err(DatabaseError::Validation(format!(
                    "devis {id} was already converted to {invoice_id}"
                )));
            }

            let number = invoice_number.map_or_else(|| default_invoice_number(&devis.number), String::from);
            let invoice_body = json!({
                "planner_id": devis.planner_id,
                "client_id": devis.client_id,
                "number": number,
                "items": devis.items,
                "total_cents": devis.total_cents,
                "paid_cents": 0,
                "status": InvoiceStatus::Draft,
                "devis_id": devis.id,
            });
            let invoice_id = crate::generate_id(&tx, Collection::Invoices.id_prefix()).await?;
            let Value::Object(invoice_data) = invoice_body else {
                return Err(DatabaseError::Query("invoice body is not an object".into()));
            };
            let invoice_doc = insert(&tx, Collection::Invoices, &invoice_id, invoice_data).await?;

            let mut devis_data = doc.data.clone();
            devis_data.insert("invoice_id".into(), Value::String(invoice_id));
            let devis_doc = write(&tx, &doc, devis_data).await?;
            Ok((devis_doc, invoice_doc))
        }
        .await;
        let (devis_doc, invoice_doc) = finish(tx, result).await?;

        let conversion = DevisConversion {
            devis: devis_doc.into_entity()?,
            invoice: invoice_doc.into_entity::<Invoice>()?,
        };
        tracing::debug!(devis_id = %id, invoice_id = %conversion.invoice.id, "devis converted");
        Ok(conversion)
    }

    /// Record the envelope a devis was sent for signature in. A draft devis
    /// becomes `sent`.
    pub async fn attach_devis_signature(
        &self,
        id: &str,
        signature: SignatureTracking,
    ) -> Result<Devis, DatabaseError> {
        self.modify_entity(id, |devis: &mut Devis| {
            if devis.status != DevisStatus::Sent {
                if !devis.status.can_transition_to(DevisStatus::Sent) {
                    return Err(invalid_transition(
                        Devis::NAME,
                        id,
                        devis.status,
                        DevisStatus::Sent,
                    ));
                }
                devis.status = DevisStatus::Sent;
            }
            devis.signature = Some(signature);
            Ok(())
        })
        .await
    }

    /// Write the signature state computed from the devis' envelope.
    pub async fn apply_devis_signature(
        &self,
        id: &str,
        patch: &DevisSignaturePatch,
    ) -> Result<Devis, DatabaseError> {
        self.modify_entity(id, |devis: &mut Devis| {
            devis.signature = Some(patch.signature.clone());
            devis.status = patch.status;
            Ok(())
        })
        .await
    }

    /// Sent devis with an envelope still open for signing.
    ///
    /// Voided, declined and completed envelopes are settled and never polled
    /// again, even when the devis itself stayed `sent`.
    pub async fn list_devis_awaiting_signature(&self) -> Result<Vec<Devis>, DatabaseError> {
        let query = Query::new()
            .where_eq("status", DevisStatus::Sent.as_str())
            .where_op("signature.envelope_id", FilterOp::NotEq, Value::Null)
            .where_op(
                "signature.envelope_status",
                FilterOp::NotIn,
                json!(["voided", "declined", "completed"]),
            );
        self.list_devis(&query).await
    }
}
