use chrono::{DateTime, Utc};
use noces_core::entities::Invoice;
use noces_core::enums::{InvoiceStatus, PaymentLinkStatus};
use noces_core::sync::InvoicePaymentPatch;

use super::payment_links::{Payment, PaymentLink, PaymentStatus};
use crate::error::IntegrationError;

/// Compute the invoice patch implied by a payment link and its payments.
///
/// Paid amount is what the invoice had received when the link was attached
/// plus the link's succeeded payments. It never drops below what the invoice
/// already records and never exceeds its total (overpayments are logged and
/// clamped). A link reported as `paid` settles the invoice.
/// Returns `None` when the invoice already reflects this state, and for
/// cancelled invoices.
///
/// # Errors
///
/// Returns an error when a payment amount is not an exact decimal or the sum
/// overflows.
pub fn reconcile_invoice_payment(
    invoice: &Invoice,
    link: &PaymentLink,
    payments: &[Payment],
    now: DateTime<Utc>,
) -> Result<Option<InvoicePaymentPatch>, IntegrationError> {
    if invoice.status == InvoiceStatus::Cancelled {
        return Ok(None);
    }

    let mut received: i64 = 0;
    let mut last_paid_at: Option<DateTime<Utc>> = None;
    for payment in payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Succeeded)
    {
        received = received
            .checked_add(payment.amount.to_cents()?)
            .ok_or_else(|| IntegrationError::Parse("payment total overflows".into()))?;
        last_paid_at = last_paid_at.max(payment.created_at);
    }

    let computed = invoice
        .paid_before_link_cents
        .max(0)
        .checked_add(received)
        .ok_or_else(|| IntegrationError::Parse("payment total overflows".into()))?;
    if computed > invoice.total_cents {
        tracing::warn!(
            invoice_id = %invoice.id,
            received,
            paid_before_link = invoice.paid_before_link_cents,
            total = invoice.total_cents,
            "invoice received more than its total; clamping"
        );
    }
    let mut paid = computed.min(invoice.total_cents).max(invoice.paid_cents).max(0);
    if link.status == PaymentLinkStatus::Paid {
        paid = invoice.total_cents;
    }

    let status = if invoice.status == InvoiceStatus::Paid
        || (paid >= invoice.total_cents && (paid > 0 || link.status == PaymentLinkStatus::Paid))
    {
        InvoiceStatus::Paid
    } else if paid > 0 {
        InvoiceStatus::PartiallyPaid
    } else {
        invoice.status
    };

    let paid_at = if status == InvoiceStatus::Paid {
        invoice.paid_at.or(last_paid_at).or(Some(now))
    } else {
        invoice.paid_at
    };

    let patch = InvoicePaymentPatch {
        paid_cents: paid,
        status,
        payment_link_status: Some(link.status),
        paid_at,
    };
    let unchanged = patch.paid_cents == invoice.paid_cents
        && patch.status == invoice.status
        && patch.payment_link_status == invoice.payment_link_status
        && patch.paid_at == invoice.paid_at;
    Ok((!unchanged).then_some(patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qonto::Amount;
    use pretty_assertions::assert_eq;

    fn invoice(total: i64, paid: i64, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: "inv-1".into(),
            planner_id: "uid-1".into(),
            client_id: "cli-1".into(),
            number: "F-2026-001".into(),
            items: Vec::new(),
            total_cents: total,
            paid_cents: paid,
            status,
            due_date: None,
            devis_id: None,
            qonto_payment_link_id: Some("pl-1".into()),
            payment_link_url: Some("https://pay.qonto.com/pl-1".into()),
            payment_link_status: Some(PaymentLinkStatus::Open),
            paid_before_link_cents: 0,
            paid_at: None,
            pdf_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn link(status: PaymentLinkStatus) -> PaymentLink {
        PaymentLink {
            id: "pl-1".into(),
            status,
            url: None,
            amount: None,
            invoice_number: None,
            created_at: None,
        }
    }

    fn payment(value: &str, status: PaymentStatus) -> Payment {
        Payment {
            id: format!("pay-{value}"),
            status,
            amount: Amount {
                value: value.into(),
                currency: "EUR".into(),
            },
            created_at: None,
            debitor_email: None,
        }
    }

    fn apply(invoice: &mut Invoice, patch: &InvoicePaymentPatch) {
        invoice.paid_cents = patch.paid_cents;
        invoice.status = patch.status;
        invoice.payment_link_status = patch.payment_link_status;
        invoice.paid_at = patch.paid_at;
    }

    #[test]
    fn partial_payment() {
        let inv = invoice(100_000, 0, InvoiceStatus::Sent);
        let payments = [
            payment("300.00", PaymentStatus::Succeeded),
            payment("200.00", PaymentStatus::Failed),
        ];
        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Open), &payments, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(patch.paid_cents, 30_000);
        assert_eq!(patch.status, InvoiceStatus::PartiallyPaid);
        assert!(patch.paid_at.is_none());
    }

    #[test]
    fn full_payment_sets_paid_at_once() {
        let now = Utc::now();
        let mut inv = invoice(50_000, 0, InvoiceStatus::Sent);
        let payments = [payment("500", PaymentStatus::Succeeded)];

        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Paid), &payments, now)
            .unwrap()
            .unwrap();
        assert_eq!(patch.status, InvoiceStatus::Paid);
        assert_eq!(patch.paid_cents, 50_000);
        assert_eq!(patch.paid_at, Some(now));
        assert_eq!(patch.payment_link_status, Some(PaymentLinkStatus::Paid));

        apply(&mut inv, &patch);
        let later = now + chrono::TimeDelta::minutes(5);
        assert_eq!(
            reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Paid), &payments, later).unwrap(),
            None,
            "second sync with the same state is a no-op"
        );
    }

    #[test]
    fn overpayment_is_clamped() {
        let inv = invoice(10_000, 0, InvoiceStatus::Sent);
        let payments = [
            payment("80", PaymentStatus::Succeeded),
            payment("80", PaymentStatus::Succeeded),
        ];
        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Open), &payments, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(patch.paid_cents, 10_000);
        assert_eq!(patch.status, InvoiceStatus::Paid);
    }

    #[test]
    fn link_reported_paid_settles_invoice() {
        let inv = invoice(10_000, 2_000, InvoiceStatus::PartiallyPaid);
        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Paid), &[], Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(patch.paid_cents, 10_000);
        assert_eq!(patch.status, InvoiceStatus::Paid);
    }

    #[test]
    fn link_payments_add_to_amount_paid_before_link() {
        let mut inv = invoice(10_000, 4_000, InvoiceStatus::PartiallyPaid);
        inv.paid_before_link_cents = 4_000;
        let payments = [payment("60.00", PaymentStatus::Succeeded)];
        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Open), &payments, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(patch.paid_cents, 10_000);
        assert_eq!(patch.status, InvoiceStatus::Paid);

        let mut partly = invoice(10_000, 4_000, InvoiceStatus::PartiallyPaid);
        partly.paid_before_link_cents = 4_000;
        let payments = [payment("10", PaymentStatus::Succeeded)];
        let patch = reconcile_invoice_payment(&partly, &link(PaymentLinkStatus::Open), &payments, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(patch.paid_cents, 5_000);
        assert_eq!(patch.status, InvoiceStatus::PartiallyPaid);
    }

    #[test]
    fn payments_recorded_after_the_link_are_not_lowered() {
        let inv = invoice(10_000, 4_000, InvoiceStatus::PartiallyPaid);
        let payments = [payment("10", PaymentStatus::Succeeded)];
        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Open), &payments, Utc::now())
            .unwrap();
        assert_eq!(patch, None);
    }

    #[test]
    fn link_status_change_alone_is_a_patch() {
        let inv = invoice(10_000, 0, InvoiceStatus::Sent);
        let patch = reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Expired), &[], Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(patch.status, InvoiceStatus::Sent);
        assert_eq!(patch.payment_link_status, Some(PaymentLinkStatus::Expired));
    }

    #[test]
    fn cancelled_invoices_are_left_alone() {
        let inv = invoice(10_000, 0, InvoiceStatus::Cancelled);
        let payments = [payment("100", PaymentStatus::Succeeded)];
        assert_eq!(
            reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Paid), &payments, Utc::now())
                .unwrap(),
            None
        );
    }

    #[test]
    fn inexact_payment_amount_is_an_error() {
        let inv = invoice(10_000, 0, InvoiceStatus::Sent);
        let payments = [payment("1.234", PaymentStatus::Succeeded)];
        assert!(
            reconcile_invoice_payment(&inv, &link(PaymentLinkStatus::Open), &payments, Utc::now())
                .is_err()
        );
    }
}
