//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use noces_config::NocesConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_project_config_from_noces_dir() {
    Jail::expect_with(|jail| {
        jail.create_dir(".noces")?;
        jail.create_file(
            ".noces/config.toml",
            r#"
[store]
path = "planner.db"

[qonto]
login = "maison-fleur"
secret_key = "sk-123"
sandbox = true
staging_token = "stg"
webhook_secret = "whsec"
webhook_tolerance_secs = 120

[general]
default_limit = 50
"#,
        )?;

        let config: NocesConfig = NocesConfig::figment().extract()?;
        assert_eq!(config.store.path, "planner.db");
        assert!(config.qonto.has_api_key());
        assert!(config.qonto.sandbox);
        assert_eq!(config.qonto.staging_token, "stg");
        assert_eq!(config.qonto.webhook_tolerance_secs, 120);
        assert_eq!(config.general.default_limit, 50);
        assert_eq!(config.general.currency, "EUR");
        Ok(())
    });
}

#[test]
fn loads_docusign_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[docusign]
account_id = "acc-guid"
integration_key = "ik-guid"
user_id = "user-guid"
private_key_path = "keys/docusign.pem"
"#,
        )?;

        let config: NocesConfig = Figment::from(Serialized::defaults(NocesConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.docusign.account_id, "acc-guid");
        assert!(config.docusign.has_jwt_grant());
        assert!(config.docusign.is_configured());
        assert_eq!(config.docusign.base_uri, "https://demo.docusign.net");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[cloudinary]
cloud_name = "from-toml"
api_key = "key"
api_secret = "secret"
"#,
        )?;
        jail.set_env("NOCES_CLOUDINARY__CLOUD_NAME", "from-env");

        let config: NocesConfig = Figment::from(Serialized::defaults(NocesConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("NOCES_").split("__"))
            .extract()?;

        assert_eq!(config.cloudinary.cloud_name, "from-env");
        assert_eq!(config.cloudinary.api_key, "key");
        Ok(())
    });
}

#[test]
fn invalid_type_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".noces")?;
        jail.create_file(
            ".noces/config.toml",
            r#"
[general]
default_limit = "lots"
"#,
        )?;

        assert!(NocesConfig::load().is_err());
        Ok(())
    });
}
