//! Firebase Auth over the Identity Toolkit and Secure Token REST APIs.

use chrono::{DateTime, TimeDelta, Utc};
use noces_config::FirebaseConfig;
use serde::Deserialize;
use serde_json::json;

use crate::claims::decode_claims;
use crate::error::AuthError;
use crate::session::Session;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

/// Account as returned by `accounts:lookup`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseAccount {
    #[serde(rename = "localId")]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<FirebaseAccount>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firebase Auth REST client.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    identity_url: String,
    token_url: String,
}

impl FirebaseAuth {
    /// Client for `api_key`, talking to the Auth emulator when `emulator_host`
    /// (`host:port`) is given.
    #[must_use]
    pub fn new(api_key: &str, emulator_host: Option<&str>) -> Self {
        let (identity_url, token_url) = match emulator_host {
            Some(host) => (
                format!("http://{host}/identitytoolkit.googleapis.com/v1"),
                format!("http://{host}/securetoken.googleapis.com/v1"),
            ),
            None => (IDENTITY_TOOLKIT_URL.to_string(), SECURE_TOKEN_URL.to_string()),
        };
        Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("noces/", env!("CARGO_PKG_VERSION")))
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key: api_key.to_string(),
            identity_url,
            token_url,
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` when no API key is set.
    pub fn from_config(config: &FirebaseConfig) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::NotConfigured);
        }
        let emulator = config
            .uses_emulator()
            .then_some(config.emulator_host.as_str());
        Ok(Self::new(&config.api_key, emulator))
    }

    fn identity_endpoint(&self, method: &str) -> String {
        format!(
            "{}/{method}?key={}",
            self.identity_url,
            urlencoding::encode(&self.api_key)
        )
    }

    fn token_endpoint(&self) -> String {
        format!("{}/token?key={}", self.token_url, urlencoding::encode(&self.api_key))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown emails or wrong
    /// passwords, `AuthError::AccountDisabled` for disabled accounts, and
    /// `AuthError::FirebaseApi` for other API failures.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        tracing::debug!(email, "firebase sign-in");
        let resp = self
            .http
            .post(self.identity_endpoint("accounts:signInWithPassword"))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;
        let data: SignInResponse = check_response(resp, email).await?.json().await?;

        Ok(Session {
            expires_at: expiry_from(&data.expires_in)?,
            id_token: data.id_token,
            refresh_token: Some(data.refresh_token),
            uid: data.local_id,
            email: data.email.or_else(|| Some(email.to_string())),
        })
    }

    /// Exchange a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` when the refresh token was revoked
    /// or expired, `AuthError::AccountDisabled` for disabled accounts, and
    /// `AuthError::FirebaseApi` for other API failures.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoding::encode(refresh_token)
        );
        let resp = self
            .http
            .post(self.token_endpoint())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;
        let data: RefreshResponse = check_response(resp, "").await?.json().await?;

        let email = decode_claims(&data.id_token)
            .ok()
            .and_then(|claims| claims.email);
        Ok(Session {
            expires_at: expiry_from(&data.expires_in)?,
            id_token: data.id_token,
            refresh_token: Some(data.refresh_token),
            uid: data.user_id,
            email,
        })
    }

    /// Verify an ID token server-side and return its account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for expired or invalid tokens,
    /// `AuthError::AccountDisabled` when the account is disabled, and
    /// `AuthError::NotAuthenticated` when no account matches.
    pub async fn lookup(&self, id_token: &str) -> Result<FirebaseAccount, AuthError> {
        let resp = self
            .http
            .post(self.identity_endpoint("accounts:lookup"))
            .json(&json!({ "idToken": id_token }))
            .send()
            .await?;
        let data: LookupResponse = check_response(resp, "").await?.json().await?;
        let account = data
            .users
            .into_iter()
            .next()
            .ok_or(AuthError::NotAuthenticated)?;
        if account.disabled {
            return Err(AuthError::AccountDisabled(account.uid));
        }
        Ok(account)
    }
}

fn expiry_from(expires_in: &str) -> Result<DateTime<Utc>, AuthError> {
    let secs: i64 = expires_in
        .parse()
        .map_err(|_| AuthError::Other(format!("invalid expiresIn '{expires_in}'")))?;
    Ok(Utc::now() + TimeDelta::seconds(secs))
}

/// Map Firebase error codes (`{"error": {"message": "CODE : detail"}}`) to
/// [`AuthError`].
async fn check_response(
    resp: reqwest::Response,
    subject: &str,
) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    let code = message.split(" : ").next().unwrap_or_default().trim();

    Err(match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            AuthError::InvalidCredentials
        }
        "USER_DISABLED" => AuthError::AccountDisabled(subject.to_string()),
        "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            AuthError::TokenExpired
        }
        _ => AuthError::FirebaseApi {
            status: status.as_u16(),
            message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[test]
    fn production_and_emulator_endpoints() {
        let prod = FirebaseAuth::new("k 1", None);
        assert_eq!(
            prod.identity_endpoint("accounts:lookup"),
            "https://identitytoolkit.googleapis.com/v1/accounts:lookup?key=k%201"
        );
        assert_eq!(
            prod.token_endpoint(),
            "https://securetoken.googleapis.com/v1/token?key=k%201"
        );

        let emu = FirebaseAuth::new("k", Some("127.0.0.1:9099"));
        assert_eq!(
            emu.identity_endpoint("accounts:signInWithPassword"),
            "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=k"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = FirebaseAuth::from_config(&FirebaseConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::NotConfigured));
    }

    #[tokio::test]
    async fn success_passes_through() {
        let resp = check_response(mock(200, "{}"), "").await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let body = r#"{"error":{"code":400,"message":"INVALID_PASSWORD"}}"#;
        let err = check_response(mock(400, body), "ana@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn disabled_user_names_the_subject() {
        let body = r#"{"error":{"code":400,"message":"USER_DISABLED : The user account has been disabled."}}"#;
        let err = check_response(mock(400, body), "ana@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled(ref who) if who == "ana@example.com"));
    }

    #[tokio::test]
    async fn expired_refresh_token_is_token_expired() {
        let body = r#"{"error":{"code":400,"message":"TOKEN_EXPIRED"}}"#;
        let err = check_response(mock(400, body), "").await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn unknown_errors_keep_status_and_message() {
        let body = r#"{"error":{"code":429,"message":"TOO_MANY_ATTEMPTS_TRY_LATER : slow down"}}"#;
        let err = check_response(mock(429, body), "").await.unwrap_err();
        match err {
            AuthError::FirebaseApi { status, message } => {
                assert_eq!(status, 429);
                assert!(message.starts_with("TOO_MANY_ATTEMPTS_TRY_LATER"));
            }
            other => panic!("expected FirebaseApi, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept() {
        let err = check_response(mock(502, "bad gateway"), "").await.unwrap_err();
        assert!(matches!(err, AuthError::FirebaseApi { status: 502, ref message } if message == "bad gateway"));
    }

    #[test]
    fn lookup_payload_parses_disabled_flag() {
        let data: LookupResponse = serde_json::from_str(
            r#"{"users":[{"localId":"uid-1","email":"a@b.c","emailVerified":true,"disabled":true}]}"#,
        )
        .unwrap();
        assert_eq!(data.users[0].uid, "uid-1");
        assert!(data.users[0].email_verified);
        assert!(data.users[0].disabled);
    }

    #[test]
    fn expiry_parses_seconds() {
        let at = expiry_from("3600").unwrap();
        assert!(at > Utc::now() + TimeDelta::seconds(3500));
        assert!(expiry_from("soon").is_err());
    }
}
