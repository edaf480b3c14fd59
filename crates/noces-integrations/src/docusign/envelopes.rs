use base64::Engine;
use noces_core::enums::{EnvelopeStatus, RecipientStatus};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::DocuSignClient;
use crate::error::IntegrationError;
use crate::http::check_response;

/// A person asked to sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInput {
    pub name: String,
    pub email: String,
}

/// Envelope to create and send: one PDF, signers in routing order.
#[derive(Debug, Clone)]
pub struct NewEnvelope {
    pub email_subject: String,
    pub document_name: String,
    pub pdf: Vec<u8>,
    pub signers: Vec<SignerInput>,
}

/// Response to envelope creation and void.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeSummary {
    pub envelope_id: String,
    pub status: EnvelopeStatus,
    #[serde(default)]
    pub status_date_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub envelope_id: String,
    pub status: EnvelopeStatus,
    #[serde(default)]
    pub email_subject: Option<String>,
    #[serde(default)]
    pub sent_date_time: Option<String>,
    #[serde(default)]
    pub completed_date_time: Option<String>,
    #[serde(default)]
    pub voided_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub recipient_id: String,
    pub name: String,
    pub email: String,
    pub status: RecipientStatus,
    #[serde(default)]
    pub routing_order: Option<String>,
    #[serde(default)]
    pub signed_date_time: Option<String>,
}

#[derive(Deserialize)]
struct Recipients {
    #[serde(default)]
    signers: Vec<Recipient>,
}

fn envelope_body(envelope: &NewEnvelope) -> Value {
    let signers: Vec<Value> = envelope
        .signers
        .iter()
        .enumerate()
        .map(|(index, signer)| {
            let n = index + 1;
            json!({
                "name": signer.name,
                "email": signer.email,
                "recipientId": n.to_string(),
                "routingOrder": n.to_string(),
                "tabs": {
                    "signHereTabs": [{
                        "anchorString": format!("/sn{n}/"),
                        "anchorUnits": "pixels",
                        "anchorIgnoreIfNotPresent": "true",
                    }]
                }
            })
        })
        .collect();

    json!({
        "emailSubject": envelope.email_subject,
        "documents": [{
            "documentBase64": base64::engine::general_purpose::STANDARD.encode(&envelope.pdf),
            "name": envelope.document_name,
            "fileExtension": "pdf",
            "documentId": "1",
        }],
        "recipients": { "signers": signers },
        "status": "sent",
    })
}

impl DocuSignClient {
    /// Create an envelope from a PDF and send it to the signers.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Parse` for an envelope without signers or
    /// document, and HTTP/API errors from DocuSign.
    pub async fn create_envelope(
        &self,
        envelope: &NewEnvelope,
    ) -> Result<EnvelopeSummary, IntegrationError> {
        if envelope.signers.is_empty() {
            return Err(IntegrationError::Parse("an envelope needs at least one signer".into()));
        }
        if envelope.pdf.is_empty() {
            return Err(IntegrationError::Parse("an envelope needs a document".into()));
        }
        let resp = self
            .request(Method::POST, "/envelopes")
            .json(&envelope_body(envelope))
            .send()
            .await?;
        Ok(check_response(resp).await?.json().await?)
    }

    /// # Errors
    ///
    /// Returns HTTP/API errors from DocuSign.
    pub async fn get_envelope(&self, envelope_id: &str) -> Result<Envelope, IntegrationError> {
        let path = format!("/envelopes/{}", urlencoding::encode(envelope_id));
        let resp = self.request(Method::GET, &path).send().await?;
        Ok(check_response(resp).await?.json().await?)
    }

    /// Signers of an envelope with their individual status.
    ///
    /// # Errors
    ///
    /// Returns HTTP/API errors from DocuSign.
    pub async fn list_recipients(&self, envelope_id: &str) -> Result<Vec<Recipient>, IntegrationError> {
        let path = format!("/envelopes/{}/recipients", urlencoding::encode(envelope_id));
        let resp = self.request(Method::GET, &path).send().await?;
        let recipients: Recipients = check_response(resp).await?.json().await?;
        Ok(recipients.signers)
    }

    /// All documents of the envelope (with signatures) as one PDF.
    ///
    /// # Errors
    ///
    /// Returns HTTP/API errors from DocuSign.
    pub async fn download_combined_pdf(&self, envelope_id: &str) -> Result<Vec<u8>, IntegrationError> {
        let path = format!(
            "/envelopes/{}/documents/combined",
            urlencoding::encode(envelope_id)
        );
        let resp = self.request(Method::GET, &path).send().await?;
        Ok(check_response(resp).await?.bytes().await?.to_vec())
    }

    /// Void an envelope that is still out for signature.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Parse` for an empty reason, and HTTP/API
    /// errors from DocuSign (completed envelopes cannot be voided).
    pub async fn void_envelope(&self, envelope_id: &str, reason: &str) -> Result<(), IntegrationError> {
        if reason.trim().is_empty() {
            return Err(IntegrationError::Parse("a void reason is required".into()));
        }
        let path = format!("/envelopes/{}", urlencoding::encode(envelope_id));
        let resp = self
            .request(Method::PUT, &path)
            .json(&json!({ "status": "voided", "voidedReason": reason }))
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }
}
