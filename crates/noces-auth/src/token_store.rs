use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;
use crate::session::Session;

const DEFAULT_KEYRING_SERVICE: &str = "noces-cli";
const KEYRING_USER: &str = "firebase-session";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Env var holding a bare Firebase ID token (CI, scripts).
pub const TOKEN_ENV: &str = "NOCES_AUTH__TOKEN";

/// Returns the keyring service name.
///
/// Defaults to `"noces-cli"`. Override via `NOCES_KEYRING_SERVICE` so tests
/// never touch real credentials.
fn keyring_service() -> String {
    std::env::var("NOCES_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Store a session in the OS keychain. Falls back to file if keyring unavailable.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the session cannot be serialized
/// or both keyring and file storage fail.
pub fn store(session: &Session) -> Result<(), AuthError> {
    let raw = serde_json::to_string(session)
        .map_err(|e| AuthError::TokenStoreError(format!("serialize session: {e}")))?;
    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(&raw) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file(&credentials_path()?, &raw)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file(&credentials_path()?, &raw)
        }
    }
}

/// Load a session. Priority: keyring, then `NOCES_AUTH__TOKEN`, then
/// `~/.noces/credentials`.
#[must_use]
pub fn load() -> Option<Session> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && let Ok(raw) = entry.get_password()
        && let Some(session) = parse_stored(&raw)
    {
        return Some(session);
    }

    if let Ok(token) = std::env::var(TOKEN_ENV)
        && let Some(session) = parse_stored(&token)
    {
        return Some(session);
    }

    credentials_path()
        .ok()
        .and_then(|path| load_file(&path))
        .and_then(|raw| parse_stored(&raw))
}

/// Delete stored credentials from keyring and file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    // May not exist.
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }

    let path = credentials_path()?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

/// Detect which tier the current session came from (for status display).
#[must_use]
pub fn detect_token_source() -> Option<&'static str> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && entry.get_password().is_ok_and(|raw| parse_stored(&raw).is_some())
    {
        return Some("keyring");
    }
    if std::env::var(TOKEN_ENV).is_ok_and(|t| parse_stored(&t).is_some()) {
        return Some("env");
    }
    if credentials_path()
        .ok()
        .and_then(|path| load_file(&path))
        .is_some()
    {
        return Some("file");
    }
    None
}

/// Stored values are either a JSON session or a bare ID token.
fn parse_stored(raw: &str) -> Option<Session> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('{') {
        return serde_json::from_str(raw)
            .inspect_err(|error| tracing::warn!(%error, "ignoring unreadable stored session"))
            .ok();
    }
    Session::from_id_token(raw)
        .inspect_err(|error| tracing::warn!(%error, "ignoring unreadable stored token"))
        .ok()
}

fn credentials_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".noces").join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found, cannot store credentials".into())
        })
}

fn store_file(path: &Path, contents: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, contents)
        .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStoreError(format!("chmod {}: {e}", path.display())))?;
    }
    Ok(())
}

fn load_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::tests::make_jwt;
    use chrono::Utc;

    fn session() -> Session {
        Session {
            id_token: "id.token.sig".into(),
            refresh_token: Some("refresh".into()),
            uid: "uid-1".into(),
            email: Some("ana@example.com".into()),
            expires_at: chrono::DateTime::from_timestamp(Utc::now().timestamp() + 3600, 0)
                .unwrap(),
        }
    }

    #[test]
    fn credentials_path_is_under_home() {
        let path = credentials_path().expect("should resolve");
        assert!(path.ends_with(".noces/credentials"));
    }

    #[test]
    fn file_store_load_cycle_is_private() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("nested").join("credentials");
        let raw = serde_json::to_string(&session()).unwrap();

        store_file(&path, &raw).unwrap();
        let loaded = load_file(&path).and_then(|raw| parse_stored(&raw)).unwrap();
        assert_eq!(loaded, session());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }
    }

    #[test]
    fn load_file_ignores_empty_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("credentials");
        fs::write(&path, "   \n  ").unwrap();
        assert!(load_file(&path).is_none());
    }

    #[test]
    fn bare_id_tokens_become_sessions() {
        let exp = Utc::now().timestamp() + 600;
        let jwt = make_jwt(&format!(r#"{{"user_id":"uid-ci","exp":{exp}}}"#));
        let session = parse_stored(&format!("{jwt}\n")).unwrap();
        assert_eq!(session.uid, "uid-ci");
        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn garbage_is_ignored() {
        assert!(parse_stored("").is_none());
        assert!(parse_stored("{not json").is_none());
        assert!(parse_stored("not-a-jwt").is_none());
    }
}
