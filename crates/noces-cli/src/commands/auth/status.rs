use noces_auth::FirebaseAuth;
use noces_auth::token_store::detect_token_source;
use noces_config::NocesConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize, Default)]
struct AuthStatusResponse {
    authenticated: bool,
    uid: Option<String>,
    email: Option<String>,
    expires_at: Option<String>,
    token_source: Option<String>,
    note: Option<String>,
}

pub async fn handle(flags: &GlobalFlags, config: &NocesConfig) -> anyhow::Result<()> {
    let status = if config.firebase.is_configured() {
        let auth = FirebaseAuth::from_config(&config.firebase)?;
        match noces_auth::resolve_session(&auth).await {
            Ok(session) => AuthStatusResponse {
                authenticated: true,
                uid: Some(session.uid),
                email: session.email,
                expires_at: Some(session.expires_at.to_rfc3339()),
                token_source: detect_token_source().map(str::to_string),
                note: None,
            },
            Err(error) => AuthStatusResponse {
                token_source: detect_token_source().map(str::to_string),
                note: Some(error.to_string()),
                ..AuthStatusResponse::default()
            },
        }
    } else {
        AuthStatusResponse {
            note: Some("NOCES_FIREBASE__API_KEY not configured; running in local mode".into()),
            ..AuthStatusResponse::default()
        }
    };

    output(&status, flags.format)
}
