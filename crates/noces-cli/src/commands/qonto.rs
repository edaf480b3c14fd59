use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use noces_config::NocesConfig;
use noces_integrations::qonto::{QontoOAuth, WebhookVerifier, generate_state};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{QontoCommands, QontoVerifyArgs};
use crate::commands::shared::clients::qonto_credentials;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct QontoConnectResponse {
    provider: String,
    connected: bool,
    expires_at: Option<DateTime<Utc>>,
    scope: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookVerifyResponse {
    verified: bool,
    event_type: String,
    id: Option<String>,
    payment_link_id: Option<String>,
}

/// Handle `noces qonto connect`. `verify` runs before the store is opened.
pub async fn handle(action: &QontoCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        QontoCommands::Connect { timeout } => connect(*timeout, ctx, flags).await,
        QontoCommands::Verify(_) => unreachable!("qonto verify is handled before context init"),
    }
}

async fn connect(timeout_secs: u64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let oauth = QontoOAuth::from_config(&ctx.config.qonto)?;
    let (bind_addr, callback_path) = callback_target(oauth.redirect_uri())?;

    let server = tiny_http::Server::http(bind_addr.as_str())
        .map_err(|error| anyhow::anyhow!("failed to listen on {bind_addr}: {error}"))?;

    let state = generate_state()?;
    let authorize_url = oauth.authorize_url(&state);
    eprintln!("Opening browser to: {authorize_url}");
    if let Err(error) = open::that(&authorize_url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    let timeout = Duration::from_secs(timeout_secs);
    let code = tokio::task::spawn_blocking(move || {
        wait_for_code(&server, &callback_path, &state, timeout)
    })
    .await
    .context("qonto callback listener stopped unexpectedly")??;

    let issued_at = Utc::now();
    let token = oauth
        .exchange_code(&code)
        .await
        .context("failed to exchange the Qonto authorization code")?;
    let saved = ctx
        .service
        .save_integration_credentials(qonto_credentials(token, issued_at))
        .await?;
    tracing::info!(provider = %saved.provider, "qonto account connected");

    output(
        &QontoConnectResponse {
            provider: saved.provider,
            connected: true,
            expires_at: saved.expires_at,
            scope: saved.scope,
        },
        flags.format,
    )
}

/// Handle `noces qonto verify`.
pub fn verify(args: &QontoVerifyArgs, flags: &GlobalFlags, config: &NocesConfig) -> anyhow::Result<()> {
    let payload = std::fs::read(&args.payload)
        .with_context(|| format!("failed to read payload {}", args.payload.display()))?;
    let verifier = WebhookVerifier::from_config(&config.qonto)?;
    let event = verifier.verify_event(&payload, &args.signature)?;
    let payment_link_id = event.payment_link_id().map(str::to_string);

    output(
        &WebhookVerifyResponse {
            verified: true,
            event_type: event.event_type,
            id: event.id,
            payment_link_id,
        },
        flags.format,
    )
}

/// Split a loopback redirect URI into a bind address and the callback path.
fn callback_target(redirect_uri: &str) -> anyhow::Result<(String, String)> {
    let Some(rest) = redirect_uri.strip_prefix("http://") else {
        bail!("qonto redirect uri must be a plain http loopback url, got '{redirect_uri}'");
    };
    let (authority, path) = rest
        .split_once('/')
        .map_or((rest, "/".to_string()), |(authority, path)| {
            (authority, format!("/{path}"))
        });
    if !authority.contains(':') {
        bail!("qonto redirect uri '{redirect_uri}' needs an explicit port");
    }
    Ok((authority.to_string(), path))
}

#[derive(Debug, PartialEq, Eq)]
enum CallbackParams {
    Code { code: String, state: Option<String> },
    Denied(String),
    Pending,
}

fn parse_callback_query(query: &str) -> anyhow::Result<CallbackParams> {
    let mut code = None;
    let mut state = None;
    let mut error = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .with_context(|| format!("invalid callback parameter '{key}'"))?
            .into_owned();
        match key {
            "code" => code = Some(value),
            "state" => state = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }
    Ok(match (code, error) {
        (_, Some(error)) => CallbackParams::Denied(error),
        (Some(code), None) => CallbackParams::Code { code, state },
        (None, None) => CallbackParams::Pending,
    })
}

fn respond_html(request: tiny_http::Request, status: u16, body: &str) {
    let mut response = tiny_http::Response::from_string(format!("<html><body>{body}</body></html>"))
        .with_status_code(status);
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}

/// Block until the redirect carries an authorization code.
///
/// Requests for other paths (favicon, preflight) get a 204 and the loop
/// keeps waiting.
fn wait_for_code(
    server: &tiny_http::Server,
    callback_path: &str,
    expected_state: &str,
    timeout: Duration,
) -> anyhow::Result<String> {
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let request = match server.recv_timeout(remaining) {
            Ok(Some(request)) => request,
            Ok(None) => bail!("qonto callback timed out after {}s", timeout.as_secs()),
            Err(error) => bail!("qonto callback listener failed: {error}"),
        };

        let url = request.url().to_string();
        let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
        if path != callback_path {
            let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            continue;
        }

        match parse_callback_query(query)? {
            CallbackParams::Code { code, state } => {
                if state.as_deref() != Some(expected_state) {
                    respond_html(request, 400, "<h1>Connection failed</h1><p>State mismatch. Check CLI output.</p>");
                    bail!("qonto callback state mismatch");
                }
                respond_html(request, 200, "<h1>Qonto connected</h1><p>You can close this tab.</p>");
                return Ok(code);
            }
            CallbackParams::Denied(error) => {
                respond_html(request, 400, "<h1>Connection refused</h1><p>Check CLI output.</p>");
                bail!("qonto authorization refused: {error}");
            }
            CallbackParams::Pending => {
                respond_html(request, 200, "<h1>Waiting for Qonto…</h1>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use noces_config::NocesConfig;
    use noces_integrations::qonto::sign_payload;
    use pretty_assertions::assert_eq;

    use super::{CallbackParams, callback_target, parse_callback_query, verify};
    use crate::cli::subcommands::QontoVerifyArgs;
    use crate::cli::{GlobalFlags, OutputFormat};

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn callback_target_splits_authority_and_path() {
        let (addr, path) = callback_target("http://127.0.0.1:8765/callback").unwrap();
        assert_eq!(addr, "127.0.0.1:8765");
        assert_eq!(path, "/callback");

        let (addr, path) = callback_target("http://localhost:9000").unwrap();
        assert_eq!(addr, "localhost:9000");
        assert_eq!(path, "/");
    }

    #[test]
    fn callback_target_rejects_https_and_missing_port() {
        assert!(callback_target("https://app.example.com/callback").is_err());
        assert!(callback_target("http://localhost/callback").is_err());
    }

    #[test]
    fn callback_query_extracts_code_and_state() {
        let parsed = parse_callback_query("code=abc%2F123&state=s-1&scope=x").unwrap();
        assert_eq!(
            parsed,
            CallbackParams::Code {
                code: "abc/123".to_string(),
                state: Some("s-1".to_string()),
            }
        );
    }

    #[test]
    fn callback_query_reports_denial_and_pending() {
        assert_eq!(
            parse_callback_query("error=access_denied&state=s-1").unwrap(),
            CallbackParams::Denied("access_denied".to_string())
        );
        assert_eq!(parse_callback_query("").unwrap(), CallbackParams::Pending);
    }

    #[test]
    fn verify_accepts_freshly_signed_payload() {
        let dir = tempfile::tempdir().unwrap();
        let payload_path = dir.path().join("event.json");
        let payload = br#"{"event_type":"payment_link.paid","data":{"payment_link_id":"pl-1"}}"#;
        std::fs::write(&payload_path, payload).unwrap();

        let mut config = NocesConfig::default();
        config.qonto.webhook_secret = "whsec".to_string();
        let signature = sign_payload("whsec", chrono::Utc::now().timestamp(), payload).unwrap();

        let args = QontoVerifyArgs {
            payload: payload_path,
            signature,
        };
        verify(&args, &flags(), &config).unwrap();
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let dir = tempfile::tempdir().unwrap();
        let payload_path = dir.path().join("event.json");
        std::fs::write(&payload_path, br#"{"event_type":"payment_link.paid"}"#).unwrap();

        let mut config = NocesConfig::default();
        config.qonto.webhook_secret = "whsec".to_string();
        let signature = sign_payload(
            "whsec",
            chrono::Utc::now().timestamp(),
            br#"{"event_type":"payment_link.canceled"}"#,
        )
        .unwrap();

        let args = QontoVerifyArgs {
            payload: payload_path,
            signature,
        };
        assert!(verify(&args, &flags(), &config).is_err());
    }

    #[test]
    fn verify_requires_webhook_secret() {
        let dir = tempfile::tempdir().unwrap();
        let payload_path = dir.path().join("event.json");
        std::fs::write(&payload_path, b"{}").unwrap();

        let args = QontoVerifyArgs {
            payload: payload_path,
            signature: "t=1,v1=00".to_string(),
        };
        assert!(verify(&args, &flags(), &NocesConfig::default()).is_err());
    }
}
