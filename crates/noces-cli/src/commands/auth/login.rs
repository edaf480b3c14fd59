use anyhow::Context;
use noces_auth::FirebaseAuth;
use noces_config::NocesConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    uid: String,
    email: Option<String>,
    expires_at: String,
}

pub async fn handle(
    args: &AuthLoginArgs,
    flags: &GlobalFlags,
    config: &NocesConfig,
) -> anyhow::Result<()> {
    let auth = FirebaseAuth::from_config(&config.firebase)?;
    let password = resolve_password(args.password.as_deref(), || prompt_password(&args.email))?;

    let session = noces_auth::login(&auth, args.email.trim(), &password).await?;
    output(
        &AuthLoginResponse {
            authenticated: true,
            uid: session.uid,
            email: session.email,
            expires_at: session.expires_at.to_rfc3339(),
        },
        flags.format,
    )
}

/// Use `--password` when given, otherwise ask for it.
fn resolve_password(
    given: Option<&str>,
    prompt: impl FnOnce() -> anyhow::Result<String>,
) -> anyhow::Result<String> {
    let password = match given {
        Some(password) => password.to_string(),
        None => prompt()?,
    };
    if password.is_empty() {
        anyhow::bail!("auth login: password is empty");
    }
    Ok(password)
}

/// Hidden password prompt on stderr so stdout stays clean.
fn prompt_password(email: &str) -> anyhow::Result<String> {
    dialoguer::Password::new()
        .with_prompt(format!("Password for {email}"))
        .allow_empty_password(true)
        .interact()
        .context("failed to read password (pass --password when not on a terminal)")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::resolve_password;

    #[test]
    fn given_password_skips_prompt() {
        let password = resolve_password(Some("s3cret pass"), || panic!("prompted")).unwrap();
        assert_eq!(password, "s3cret pass");
    }

    #[test]
    fn prompted_password_is_used() {
        let password = resolve_password(None, || Ok("typed".to_string())).unwrap();
        assert_eq!(password, "typed");
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(resolve_password(Some(""), || Ok(String::new())).is_err());
        assert!(resolve_password(None, || Ok(String::new())).is_err());
    }
}
