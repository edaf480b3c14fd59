use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be parsed or a value has the wrong type.
    #[error("failed to load noces configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
