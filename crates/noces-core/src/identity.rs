use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Planner ID stamped on documents written without an authenticated identity.
pub const LOCAL_PLANNER_ID: &str = "local";

/// Authenticated account, as produced by `noces-auth`.
///
/// Contains only data fields: no auth logic, no HTTP calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthAccount {
    /// Firebase user ID (`localId` / `user_id` claim).
    pub uid: String,
    /// Account email, if the provider exposes one.
    pub email: Option<String>,
}

/// Tenant identity used to scope document access.
///
/// Resolved from an [`AuthAccount`] by `noces-db`: an account whose email
/// matches a client's `portal_email` gets the client-portal identity,
/// everyone else is a planner owning the documents stamped with their uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Identity {
    Planner { planner_id: String },
    Client { planner_id: String, client_id: String },
}

impl Identity {
    #[must_use]
    pub fn planner_id(&self) -> &str {
        match self {
            Self::Planner { planner_id } | Self::Client { planner_id, .. } => planner_id,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        match self {
            Self::Planner { .. } => None,
            Self::Client { client_id, .. } => Some(client_id),
        }
    }

    #[must_use]
    pub const fn is_portal(&self) -> bool {
        matches!(self, Self::Client { .. })
    }
}
