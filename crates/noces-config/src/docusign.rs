//! DocuSign eSignature configuration.

use serde::{Deserialize, Serialize};

fn default_base_uri() -> String {
    "https://demo.docusign.net".to_string()
}

fn default_oauth_host() -> String {
    "account-d.docusign.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocuSignConfig {
    /// API base URI of the account (demo or production shard).
    #[serde(default = "default_base_uri")]
    pub base_uri: String,

    #[serde(default)]
    pub account_id: String,

    /// Pre-issued access token. Wins over the JWT grant when set.
    #[serde(default)]
    pub access_token: String,

    /// Integration key (OAuth client ID) used as JWT issuer.
    #[serde(default)]
    pub integration_key: String,

    /// User GUID impersonated by the JWT grant.
    #[serde(default)]
    pub user_id: String,

    /// RSA private key in PEM form.
    #[serde(default)]
    pub private_key: String,

    /// Path to the RSA private key, read when `private_key` is empty.
    #[serde(default)]
    pub private_key_path: String,

    /// OAuth host (`account-d.docusign.com` for demo, `account.docusign.com` for production).
    #[serde(default = "default_oauth_host")]
    pub oauth_host: String,
}

impl Default for DocuSignConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            account_id: String::new(),
            access_token: String::new(),
            integration_key: String::new(),
            user_id: String::new(),
            private_key: String::new(),
            private_key_path: String::new(),
            oauth_host: default_oauth_host(),
        }
    }
}

impl DocuSignConfig {
    /// An account plus either a token or a complete JWT grant setup.
    pub fn is_configured(&self) -> bool {
        !self.account_id.is_empty() && (!self.access_token.is_empty() || self.has_jwt_grant())
    }

    pub fn has_jwt_grant(&self) -> bool {
        !self.integration_key.is_empty()
            && !self.user_id.is_empty()
            && (!self.private_key.is_empty() || !self.private_key_path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_demo_environment() {
        let config = DocuSignConfig::default();
        assert_eq!(config.base_uri, "https://demo.docusign.net");
        assert_eq!(config.oauth_host, "account-d.docusign.com");
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_with_access_token() {
        let config = DocuSignConfig {
            account_id: "acc-1".into(),
            access_token: "eyJ".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(!config.has_jwt_grant());
    }

    #[test]
    fn configured_with_jwt_grant() {
        let config = DocuSignConfig {
            account_id: "acc-1".into(),
            integration_key: "ik".into(),
            user_id: "user-guid".into(),
            private_key_path: "/keys/docusign.pem".into(),
            ..Default::default()
        };
        assert!(config.has_jwt_grant());
        assert!(config.is_configured());
    }

    #[test]
    fn account_required() {
        let config = DocuSignConfig {
            access_token: "eyJ".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
