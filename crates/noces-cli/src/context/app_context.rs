use std::path::Path;

use anyhow::Context;
use noces_auth::{AuthError, FirebaseAuth, Session};
use noces_config::NocesConfig;
use noces_core::identity::AuthAccount;
use noces_db::service::NocesService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: NocesService,
    pub config: NocesConfig,
    pub session: Option<Session>,
}

impl AppContext {
    /// Open the document store and scope it to the signed-in user.
    ///
    /// Without Firebase configuration, or without a session on a local
    /// store, commands run in local mode (unscoped). A remote store always
    /// requires a verified session.
    pub async fn init(config: NocesConfig) -> anyhow::Result<Self> {
        let (session, account) = resolve_auth(&config).await?;

        let mut service = if config.store.is_configured() {
            NocesService::new_remote(&config.store.url, &config.store.auth_token, None)
                .await
                .context("failed to connect to the remote noces store")?
        } else {
            ensure_parent_dir(&config.store.path)?;
            NocesService::new_local(&config.store.path, None)
                .await
                .with_context(|| format!("failed to open noces store at {}", config.store.path))?
        };

        if let Some(account) = account {
            let identity = service
                .resolve_identity(&account)
                .await
                .context("failed to resolve tenant identity")?;
            tracing::debug!(?identity, "identity resolved");
            service.set_identity(Some(identity));
        }

        Ok(Self {
            service,
            config,
            session,
        })
    }
}

/// Resolve and verify the stored Firebase session.
///
/// Returns `(session, verified account)`; both are `None` in local mode.
async fn resolve_auth(config: &NocesConfig) -> anyhow::Result<(Option<Session>, Option<AuthAccount>)> {
    let remote_store = config.store.is_configured();
    if !config.firebase.is_configured() {
        if remote_store {
            anyhow::bail!(
                "a remote store needs Firebase auth: set NOCES_FIREBASE__API_KEY and run 'noces auth login'"
            );
        }
        return Ok((None, None));
    }

    let auth = FirebaseAuth::from_config(&config.firebase)?;
    let verified = match noces_auth::resolve_session(&auth).await {
        Ok(session) => match auth.lookup(&session.id_token).await {
            Ok(account) => Ok((session, account)),
            Err(error) => Err(error),
        },
        Err(error) => Err(error),
    };

    match verified {
        Ok((session, account)) => {
            let account = AuthAccount {
                uid: account.uid,
                email: account.email.or_else(|| session.email.clone()),
            };
            Ok((Some(session), Some(account)))
        }
        Err(error) if remote_store => {
            Err(anyhow::Error::new(error).context("sign in with 'noces auth login' first"))
        }
        Err(AuthError::NotAuthenticated) => {
            tracing::debug!("no Firebase session found; running in local mode");
            Ok((None, None))
        }
        Err(error) => {
            tracing::warn!(%error, "Firebase session could not be verified; running in local mode");
            Ok((None, None))
        }
    }
}

fn ensure_parent_dir(path: &str) -> anyhow::Result<()> {
    if path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_mode_without_firebase() {
        let config = NocesConfig::default();
        let (session, account) = resolve_auth(&config).await.expect("local mode");
        assert!(session.is_none());
        assert!(account.is_none());
    }

    #[tokio::test]
    async fn remote_store_requires_firebase() {
        let mut config = NocesConfig::default();
        config.store.url = "libsql://noces.example.turso.io".into();
        config.store.auth_token = "token".into();
        let err = resolve_auth(&config).await.expect_err("should require auth");
        assert!(err.to_string().contains("NOCES_FIREBASE__API_KEY"));
    }

    #[test]
    fn creates_store_directory() {
        let temp = tempfile::TempDir::new().expect("tempdir should create");
        let path = temp.path().join(".noces/noces.db");
        ensure_parent_dir(path.to_str().expect("utf-8 path")).expect("dir should create");
        assert!(temp.path().join(".noces").is_dir());
        ensure_parent_dir(":memory:").expect("memory needs no dir");
    }

    #[tokio::test]
    async fn in_memory_store_opens_in_local_mode() {
        let mut config = NocesConfig::default();
        config.store.path = ":memory:".into();
        let ctx = AppContext::init(config).await.expect("context should init");
        assert!(ctx.session.is_none());
        assert!(ctx.service.identity().is_none());
    }
}
