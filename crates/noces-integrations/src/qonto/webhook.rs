//! Qonto webhook signature verification.
//!
//! The signature header has the form `t=<unix>,v1=<hex>[,v1=<hex>...]`. Each
//! `v1` is an HMAC-SHA256 over `{t}.{raw body}` keyed with the webhook
//! secret. Several `v1` entries appear while a secret is being rotated; one
//! match is enough.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use noces_config::QontoConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;

use crate::error::{IntegrationError, SignatureError};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Qonto-Signature";

/// A verified webhook notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default, alias = "event_id")]
    pub id: Option<String>,
    #[serde(alias = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl WebhookEvent {
    /// Payment link the event is about, for `payment_link.*` events.
    #[must_use]
    pub fn payment_link_id(&self) -> Option<&str> {
        self.data
            .get("payment_link_id")
            .or_else(|| {
                self.event_type
                    .starts_with("payment_link")
                    .then(|| self.data.get("id"))
                    .flatten()
            })
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: u64,
}

impl WebhookVerifier {
    /// # Errors
    ///
    /// Returns `SignatureError::EmptySecret` for an empty secret.
    pub fn new(secret: impl Into<String>, tolerance_secs: u64) -> Result<Self, SignatureError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SignatureError::EmptySecret);
        }
        Ok(Self {
            secret,
            tolerance_secs,
        })
    }

    /// # Errors
    ///
    /// Returns `IntegrationError::NotConfigured` without a webhook secret.
    pub fn from_config(config: &QontoConfig) -> Result<Self, IntegrationError> {
        Self::new(&config.webhook_secret, config.webhook_tolerance_secs).map_err(|_| {
            IntegrationError::NotConfigured {
                integration: "Qonto webhooks",
                hint: "set NOCES_QONTO__WEBHOOK_SECRET",
            }
        })
    }

    /// Verify `header` against `payload` at the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::verify_at`].
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), SignatureError> {
        self.verify_at(payload, header, Utc::now().timestamp())
    }

    /// Verify `header` against `payload` as of `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns the matching [`SignatureError`] for a malformed header, a
    /// missing timestamp or `v1`, a timestamp outside the tolerance window,
    /// or when no `v1` digest matches.
    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<(), SignatureError> {
        let parsed = parse_header(header)?;
        let timestamp = parsed.timestamp.ok_or(SignatureError::MissingTimestamp)?;
        if !parsed.has_v1 {
            return Err(SignatureError::MissingSignature);
        }
        if now.abs_diff(timestamp) > self.tolerance_secs {
            return Err(SignatureError::TimestampOutsideTolerance {
                timestamp,
                tolerance_secs: self.tolerance_secs,
            });
        }

        let mac = signed_mac(&self.secret, timestamp, payload)?;
        if parsed
            .signatures
            .iter()
            .any(|signature| mac.clone().verify_slice(signature).is_ok())
        {
            Ok(())
        } else {
            Err(SignatureError::SignatureMismatch)
        }
    }

    /// Verify and parse a webhook delivery.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Auth` for a rejected signature and
    /// `IntegrationError::Parse` for a body that is not a webhook event.
    pub fn verify_event(&self, payload: &[u8], header: &str) -> Result<WebhookEvent, IntegrationError> {
        self.verify(payload, header).map_err(|e| IntegrationError::Auth {
            integration: "Qonto webhook",
            message: e.to_string(),
        })?;
        serde_json::from_slice(payload)
            .map_err(|e| IntegrationError::Parse(format!("webhook payload: {e}")))
    }
}

/// Build a signature header for `payload` (for replaying deliveries and tests).
///
/// # Errors
///
/// Returns `SignatureError::EmptySecret` for an empty secret.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
    let digest = signed_mac(secret, timestamp, payload)?.finalize().into_bytes();
    Ok(format!("t={timestamp},v1={}", hex::encode(digest)))
}

fn signed_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptySecret);
    }
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::EmptySecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

struct ParsedHeader {
    timestamp: Option<i64>,
    has_v1: bool,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<ParsedHeader, SignatureError> {
    let header = header.trim();
    if header.is_empty() {
        return Err(SignatureError::MalformedHeader("empty header".into()));
    }

    let mut parsed = ParsedHeader {
        timestamp: None,
        has_v1: false,
        signatures: Vec::new(),
    };
    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            return Err(SignatureError::MalformedHeader(format!(
                "expected key=value, got '{}'",
                part.trim()
            )));
        };
        match key.trim() {
            "t" => {
                let timestamp = value.trim().parse().map_err(|_| {
                    SignatureError::MalformedHeader(format!("invalid timestamp '{value}'"))
                })?;
                parsed.timestamp = Some(timestamp);
            }
            "v1" => {
                parsed.has_v1 = true;
                // Undecodable digests cannot match; keep looking at the others.
                if let Ok(bytes) = hex::decode(value.trim()) {
                    parsed.signatures.push(bytes);
                }
            }
            _ => {}
        }
    }
    Ok(parsed)
}
