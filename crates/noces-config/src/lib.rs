//! # noces-config
//!
//! Layered configuration loading for Noces using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`NOCES_*` prefix, `__` as separator)
//! 2. Project-level `.noces/config.toml`
//! 3. User-level `~/.config/noces/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `NOCES_QONTO__SECRET_KEY` -> `qonto.secret_key`,
//! `NOCES_DOCUSIGN__ACCOUNT_ID` -> `docusign.account_id`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use noces_config::NocesConfig;
//!
//! let config = NocesConfig::load_with_dotenv().expect("config");
//! if config.qonto.is_configured() {
//!     println!("Qonto API: {}", config.qonto.api_base_url());
//! }
//! ```

mod cloudinary;
mod docusign;
mod error;
mod firebase;
mod general;
mod qonto;
mod store;

pub use cloudinary::CloudinaryConfig;
pub use docusign::DocuSignConfig;
pub use error::ConfigError;
pub use firebase::FirebaseConfig;
pub use general::GeneralConfig;
pub use qonto::{QONTO_PRODUCTION_URL, QONTO_SANDBOX_URL, QontoConfig};
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every configuration key.
pub const ENV_PREFIX: &str = "NOCES_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NocesConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub docusign: DocuSignConfig,
    #[serde(default)]
    pub qonto: QontoConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl NocesConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type, and `ConfigError::InvalidValue` when
    /// [`Self::validate`] rejects a value.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".noces/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("noces").join("config.toml"))
    }

    /// Check values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let currency = &self.general.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidValue {
                key: "general.currency",
                reason: format!("expected an ISO 4217 code like EUR, got '{currency}'"),
            });
        }
        if self.qonto.webhook_tolerance_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "qonto.webhook_tolerance_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.qonto.has_oauth_client() && !self.qonto.redirect_uri.starts_with("http://") {
            return Err(ConfigError::InvalidValue {
                key: "qonto.redirect_uri",
                reason: "must be a loopback http:// URL served by 'noces qonto connect'".to_string(),
            });
        }
        Ok(())
    }
}
