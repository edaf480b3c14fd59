//! Shared HTTP helpers for the integration clients.
//!
//! One `reqwest::Client` per integration, a common status check (429 with
//! `Retry-After`, other failures as [`IntegrationError::Api`]) and
//! extraction of the human-readable message from each provider's error body.

use std::time::Duration;

use serde_json::Value;

use crate::error::IntegrationError;

/// Build the HTTP client used by one integration.
pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("noces/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(%error, "custom HTTP client failed to build; using defaults");
            reqwest::Client::new()
        })
}

/// `application/x-www-form-urlencoded` body from key/value pairs.
pub(crate) fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests**: [`IntegrationError::RateLimited`] with
///   `Retry-After` parsing (60 s if absent or unparseable).
/// - **Non-success status**: [`IntegrationError::Api`] with the status code
///   and the provider's error message.
pub(crate) async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, IntegrationError> {
    if resp.status() == 429 {
        return Err(IntegrationError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status, %body, "integration API error");
        return Err(IntegrationError::Api {
            status,
            message: api_message(&body),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

/// Pull the message out of Qonto (`errors[].detail`), DocuSign
/// (`errorCode` + `message`), OAuth (`error_description`) and Cloudinary
/// (`error.message`) bodies; anything else is returned as-is.
fn api_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(errors) = json.get("errors").and_then(Value::as_array) {
        let details: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.get("detail").or_else(|| e.get("message")))
            .filter_map(Value::as_str)
            .collect();
        if !details.is_empty() {
            return details.join("; ");
        }
    }
    if let Some(message) = json.get("message").and_then(Value::as_str) {
        return match json.get("errorCode").and_then(Value::as_str) {
            Some(code) => format!("{code}: {message}"),
            None => message.to_string(),
        };
    }
    if let Some(description) = json.get("error_description").and_then(Value::as_str) {
        return description.to_string();
    }
    if let Some(message) = json.pointer("/error/message").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(error) = json.get("error").and_then(Value::as_str) {
        return error.to_string();
    }
    body.trim().to_string()
}
