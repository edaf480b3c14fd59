//! Cloudinary signed uploads for generated PDFs (invoices, devis, contracts).

use base64::Engine;
use chrono::Utc;
use noces_config::CloudinaryConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::IntegrationError;
use crate::http::{build_client, check_response, form_body};

const UPLOAD_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub secure_url: String,
    pub public_id: String,
    #[serde(default)]
    pub bytes: Option<u64>,
}

pub struct CloudinaryClient {
    http: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

/// SHA-256 signature over the parameters sorted by name, joined as
/// `k=v&k=v`, with the API secret appended.
#[must_use]
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{to_sign}{api_secret}").as_bytes()))
}

impl CloudinaryClient {
    /// # Errors
    ///
    /// Returns `IntegrationError::NotConfigured` without cloud name, API key
    /// and secret.
    pub fn from_config(config: &CloudinaryConfig) -> Result<Self, IntegrationError> {
        if !config.is_configured() {
            return Err(IntegrationError::NotConfigured {
                integration: "Cloudinary",
                hint: "set NOCES_CLOUDINARY__CLOUD_NAME, __API_KEY and __API_SECRET",
            });
        }
        Ok(Self {
            http: build_client(60),
            upload_url: format!(
                "{UPLOAD_BASE_URL}/{}/image/upload",
                urlencoding::encode(&config.cloud_name)
            ),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: (!config.folder.is_empty()).then(|| config.folder.clone()),
        })
    }

    /// Upload a PDF as a base64 data URI.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Parse` when the bytes are not a PDF, and
    /// HTTP/API errors from Cloudinary.
    pub async fn upload_pdf(
        &self,
        pdf: &[u8],
        public_id: Option<&str>,
    ) -> Result<UploadedFile, IntegrationError> {
        if !pdf.starts_with(b"%PDF-") {
            return Err(IntegrationError::Parse("file is not a PDF".into()));
        }
        let file = format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(pdf)
        );
        let timestamp = Utc::now().timestamp().to_string();
        let body = self.upload_form(&file, &timestamp, public_id);

        tracing::debug!(size = pdf.len(), ?public_id, "cloudinary upload");
        let resp = self
            .http
            .post(&self.upload_url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;
        Ok(check_response(resp).await?.json().await?)
    }

    fn upload_form(&self, file: &str, timestamp: &str, public_id: Option<&str>) -> String {
        let folder = self.folder.as_deref().unwrap_or_default();
        let public_id = public_id.unwrap_or_default();
        let signed = [
            ("folder", folder),
            ("public_id", public_id),
            ("signature_algorithm", "sha256"),
            ("timestamp", timestamp),
        ];
        let signature = sign_params(&signed, &self.api_secret);

        let mut pairs: Vec<(&str, &str)> = signed.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        pairs.extend([
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
            ("file", file),
        ]);
        form_body(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(folder: &str) -> CloudinaryClient {
        CloudinaryClient::from_config(&CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "shh".into(),
            folder: folder.into(),
        })
        .unwrap()
    }

    #[test]
    fn signature_sorts_and_skips_empty_params() {
        let expected = hex::encode(Sha256::digest(b"folder=noces&timestamp=1700000000shh"));
        assert_eq!(
            sign_params(&[("timestamp", "1700000000"), ("public_id", ""), ("folder", "noces")], "shh"),
            expected
        );
    }

    #[test]
    fn upload_form_is_signed() {
        let form = client("noces").upload_form("data:application/pdf;base64,AA==", "1700000000", Some("inv-1"));
        let expected = sign_params(
            &[
                ("folder", "noces"),
                ("public_id", "inv-1"),
                ("signature_algorithm", "sha256"),
                ("timestamp", "1700000000"),
            ],
            "shh",
        );
        assert!(form.starts_with("folder=noces&public_id=inv-1&signature_algorithm=sha256&timestamp=1700000000&api_key=1234"));
        assert!(form.contains(&format!("signature={expected}")));
        assert!(form.ends_with("file=data%3Aapplication%2Fpdf%3Bbase64%2CAA%3D%3D"));
    }

    #[test]
    fn upload_form_without_folder() {
        let form = client("").upload_form("x", "1", None);
        assert!(form.starts_with("signature_algorithm=sha256&timestamp=1&api_key=1234"));
    }

    #[test]
    fn requires_configuration() {
        assert!(CloudinaryClient::from_config(&CloudinaryConfig::default()).is_err());
    }

    #[tokio::test]
    async fn non_pdf_is_rejected_before_upload() {
        let err = client("").upload_pdf(b"hello", None).await.unwrap_err();
        assert!(matches!(err, IntegrationError::Parse(_)));
    }

    #[test]
    fn upload_response_parses() {
        let file: UploadedFile = serde_json::from_str(
            r#"{"public_id":"noces/inv-1","secure_url":"https://res.cloudinary.com/demo/image/upload/v1/noces/inv-1.pdf","bytes":2048,"format":"pdf"}"#,
        )
        .unwrap();
        assert_eq!(file.public_id, "noces/inv-1");
        assert_eq!(file.bytes, Some(2048));
    }
}
