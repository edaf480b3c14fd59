//! Firebase Auth configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub project_id: String,

    /// `host:port` of the Auth emulator. When set, all requests go there.
    #[serde(default)]
    pub emulator_host: String,
}

impl FirebaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn uses_emulator(&self) -> bool {
        !self.emulator_host.is_empty()
    }
}
