//! Document store location.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".noces/noces.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Local libSQL database file. `:memory:` is accepted for throwaway runs.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote libSQL URL (e.g., `libsql://noces-prod.turso.io`). Takes
    /// precedence over `path` when set together with `auth_token`.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub auth_token: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl StoreConfig {
    /// Whether a remote database is configured.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_file() {
        let config = StoreConfig::default();
        assert_eq!(config.path, ".noces/noces.db");
        assert!(!config.is_configured());
    }

    #[test]
    fn remote_needs_url_and_token() {
        let config = StoreConfig {
            url: "libsql://noces.turso.io".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());

        let config = StoreConfig {
            auth_token: "tok".into(),
            ..config
        };
        assert!(config.is_configured());
    }
}
