use chrono::{DateTime, Utc};
use noces_core::enums::PaymentLinkStatus;
use noces_core::money::{format_cents, parse_cents};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::QontoClient;
use crate::error::IntegrationError;
use crate::http::check_response;

const PAYMENTS_PER_PAGE: u32 = 100;

/// Qonto amount: a decimal string plus ISO currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency: String,
}

impl Amount {
    #[must_use]
    pub fn from_cents(cents: i64, currency: &str) -> Self {
        Self {
            value: format_cents(cents),
            currency: currency.to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidAmount` (wrapped) for values that are not
    /// exact decimal amounts.
    pub fn to_cents(&self) -> Result<i64, IntegrationError> {
        Ok(parse_cents(&self.value)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    ApplePay,
    Paypal,
    Ideal,
    Bancontact,
}

impl PaymentMethod {
    pub const DEFAULT: &'static [Self] = &[Self::CreditCard, Self::ApplePay, Self::Paypal];
}

/// Payment link creation in invoice mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentLink {
    pub amount_cents: i64,
    pub currency: String,
    pub invoice_id: String,
    pub invoice_number: String,
    pub debitor_name: String,
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub id: String,
    pub status: PaymentLinkStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    #[serde(alias = "paid")]
    Succeeded,
    Failed,
    Refunded,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// A payment made through a payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: PaymentStatus,
    pub amount: Amount,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub debitor_email: Option<String>,
}

#[derive(Deserialize)]
struct PaymentLinkEnvelope {
    payment_link: PaymentLink,
}

#[derive(Deserialize)]
struct PaymentsPage {
    #[serde(default)]
    payments: Vec<Payment>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Deserialize)]
struct PageMeta {
    next_page: Option<u32>,
}

fn creation_body(link: &NewPaymentLink) -> serde_json::Value {
    let methods = if link.payment_methods.is_empty() {
        PaymentMethod::DEFAULT.to_vec()
    } else {
        link.payment_methods.clone()
    };
    json!({
        "payment_link": {
            "potential_payment_methods": methods,
            "reusable": false,
            "invoice_id": link.invoice_id,
            "invoice_number": link.invoice_number,
            "debitor_name": link.debitor_name,
            "amount": Amount::from_cents(link.amount_cents, &link.currency),
        }
    })
}

impl QontoClient {
    /// Create a single-use payment link for an invoice.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Parse` for non-positive amounts, and
    /// HTTP/API errors from Qonto.
    pub async fn create_payment_link(
        &self,
        link: &NewPaymentLink,
    ) -> Result<PaymentLink, IntegrationError> {
        if link.amount_cents <= 0 {
            return Err(IntegrationError::Parse(format!(
                "payment link amount must be positive, got {}",
                format_cents(link.amount_cents)
            )));
        }
        let resp = self
            .request(Method::POST, "/payment_links")
            .json(&creation_body(link))
            .send()
            .await?;
        let data: PaymentLinkEnvelope = check_response(resp).await?.json().await?;
        Ok(data.payment_link)
    }

    /// # Errors
    ///
    /// Returns HTTP/API errors from Qonto.
    pub async fn get_payment_link(&self, id: &str) -> Result<PaymentLink, IntegrationError> {
        let path = format!("/payment_links/{}", urlencoding::encode(id));
        let resp = self.request(Method::GET, &path).send().await?;
        let data: PaymentLinkEnvelope = check_response(resp).await?.json().await?;
        Ok(data.payment_link)
    }

    /// All payments of a payment link, following pagination.
    ///
    /// # Errors
    ///
    /// Returns HTTP/API errors from Qonto.
    pub async fn list_payment_link_payments(
        &self,
        id: &str,
    ) -> Result<Vec<Payment>, IntegrationError> {
        let mut payments = Vec::new();
        let mut page = 1;
        loop {
            let path = format!(
                "/payment_links/{}/payments?page={page}&per_page={PAYMENTS_PER_PAGE}",
                urlencoding::encode(id)
            );
            let resp = self.request(Method::GET, &path).send().await?;
            let data: PaymentsPage = check_response(resp).await?.json().await?;
            payments.extend(data.payments);
            match data.meta.and_then(|meta| meta.next_page) {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }
        Ok(payments)
    }

    /// # Errors
    ///
    /// Returns HTTP/API errors from Qonto.
    pub async fn deactivate_payment_link(&self, id: &str) -> Result<PaymentLink, IntegrationError> {
        let path = format!("/payment_links/{}/deactivate", urlencoding::encode(id));
        let resp = self.request(Method::PATCH, &path).send().await?;
        let data: PaymentLinkEnvelope = check_response(resp).await?.json().await?;
        Ok(data.payment_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn creation_body_uses_invoice_mode() {
        let body = creation_body(&NewPaymentLink {
            amount_cents: 125_050,
            currency: "EUR".into(),
            invoice_id: "inv-1".into(),
            invoice_number: "F-2026-001".into(),
            debitor_name: "Alex & Sam".into(),
            payment_methods: Vec::new(),
        });
        assert_eq!(
            body,
            json!({
                "payment_link": {
                    "potential_payment_methods": ["credit_card", "apple_pay", "paypal"],
                    "reusable": false,
                    "invoice_id": "inv-1",
                    "invoice_number": "F-2026-001",
                    "debitor_name": "Alex & Sam",
                    "amount": {"value": "1250.50", "currency": "EUR"},
                }
            })
        );
    }

    #[test]
    fn payment_link_fixture_parses() {
        let data: PaymentLinkEnvelope = serde_json::from_str(
            r#"{"payment_link":{"id":"pl-1","status":"open","url":"https://pay.qonto.com/pl-1",
                "amount":{"value":"300.00","currency":"EUR"},"invoice_number":"F-1",
                "created_at":"2026-03-01T10:00:00Z","extra":"ignored"}}"#,
        )
        .unwrap();
        assert_eq!(data.payment_link.status, PaymentLinkStatus::Open);
        assert_eq!(data.payment_link.amount.unwrap().to_cents().unwrap(), 30_000);
    }

    #[test]
    fn payments_page_parses_statuses() {
        let data: PaymentsPage = serde_json::from_str(
            r#"{"payments":[
                {"id":"p1","status":"succeeded","amount":{"value":"100.5","currency":"EUR"}},
                {"id":"p2","status":"paid","amount":{"value":"1","currency":"EUR"}},
                {"id":"p3","status":"chargeback","amount":{"value":"1","currency":"EUR"}}
            ],"meta":{"current_page":1,"next_page":null}}"#,
        )
        .unwrap();
        let statuses: Vec<PaymentStatus> = data.payments.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![PaymentStatus::Succeeded, PaymentStatus::Succeeded, PaymentStatus::Unknown]
        );
        assert_eq!(data.payments[0].amount.to_cents().unwrap(), 10_050);
        assert!(data.meta.unwrap().next_page.is_none());
    }

    #[test]
    fn inexact_amounts_are_rejected() {
        let amount = Amount {
            value: "10.005".into(),
            currency: "EUR".into(),
        };
        assert!(matches!(amount.to_cents(), Err(IntegrationError::Core(_))));
    }

    #[test]
    fn request_carries_auth_and_staging_headers() {
        let client = QontoClient::new(
            "https://thirdparty-sandbox.staging.qonto.co/",
            crate::qonto::QontoAuth::ApiKey {
                login: "org".into(),
                secret_key: "sk".into(),
            },
        )
        .with_staging_token("stg");
        let req = client
            .request(Method::GET, "/payment_links/pl-1")
            .build()
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://thirdparty-sandbox.staging.qonto.co/v2/payment_links/pl-1"
        );
        assert_eq!(req.headers()["authorization"], "org:sk");
        assert_eq!(req.headers()["x-qonto-staging-token"], "stg");
    }
}
