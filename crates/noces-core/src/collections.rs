//! Collection registry.
//!
//! Every document lives in exactly one collection. The registry maps each
//! collection to its storage name, ID prefix, and client-portal visibility.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;
use crate::ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Clients,
    Events,
    Tasks,
    Expenses,
    Invoices,
    Devis,
    Contracts,
    Vendors,
    Compositions,
    Articles,
    Warehouses,
    PostIts,
    Integrations,
}

impl Collection {
    /// All user-facing collections (excludes internal ones).
    pub const BUSINESS: &'static [Self] = &[
        Self::Clients,
        Self::Events,
        Self::Tasks,
        Self::Expenses,
        Self::Invoices,
        Self::Devis,
        Self::Contracts,
        Self::Vendors,
        Self::Compositions,
        Self::Articles,
        Self::Warehouses,
        Self::PostIts,
    ];

    /// Storage name of the collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Events => "events",
            Self::Tasks => "tasks",
            Self::Expenses => "expenses",
            Self::Invoices => "invoices",
            Self::Devis => "devis",
            Self::Contracts => "contracts",
            Self::Vendors => "vendors",
            Self::Compositions => "compositions",
            Self::Articles => "articles",
            Self::Warehouses => "warehouses",
            Self::PostIts => "post_its",
            Self::Integrations => "integrations",
        }
    }

    /// ID prefix for documents generated in this collection.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Clients => ids::PREFIX_CLIENT,
            Self::Events => ids::PREFIX_EVENT,
            Self::Tasks => ids::PREFIX_TASK,
            Self::Expenses => ids::PREFIX_EXPENSE,
            Self::Invoices => ids::PREFIX_INVOICE,
            Self::Devis => ids::PREFIX_DEVIS,
            Self::Contracts => ids::PREFIX_CONTRACT,
            Self::Vendors => ids::PREFIX_VENDOR,
            Self::Compositions => ids::PREFIX_COMPOSITION,
            Self::Articles => ids::PREFIX_ARTICLE,
            Self::Warehouses => ids::PREFIX_WAREHOUSE,
            Self::PostIts => ids::PREFIX_POST_IT,
            Self::Integrations => ids::PREFIX_INTEGRATION,
        }
    }

    /// Whether a client-portal identity may read this collection.
    #[must_use]
    pub const fn portal_visible(self) -> bool {
        matches!(
            self,
            Self::Clients
                | Self::Events
                | Self::Tasks
                | Self::Invoices
                | Self::Devis
                | Self::Contracts
                | Self::PostIts
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let found = match normalized.as_str() {
            "clients" | "client" => Self::Clients,
            "events" | "event" => Self::Events,
            "tasks" | "task" => Self::Tasks,
            "expenses" | "expense" => Self::Expenses,
            "invoices" | "invoice" => Self::Invoices,
            "devis" => Self::Devis,
            "contracts" | "contract" => Self::Contracts,
            "vendors" | "vendor" => Self::Vendors,
            "compositions" | "composition" => Self::Compositions,
            "articles" | "article" => Self::Articles,
            "warehouses" | "warehouse" => Self::Warehouses,
            "post_its" | "post_it" | "postits" | "postit" => Self::PostIts,
            "integrations" => Self::Integrations,
            _ => {
                return Err(CoreError::Validation(format!("unknown collection '{s}'")));
            }
        };
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("clients", Collection::Clients)]
    #[case("client", Collection::Clients)]
    #[case("Post-Its", Collection::PostIts)]
    #[case("postit", Collection::PostIts)]
    #[case("devis", Collection::Devis)]
    fn parses_aliases(#[case] raw: &str, #[case] expected: Collection) {
        assert_eq!(raw.parse::<Collection>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_collection() {
        let err = "guests".parse::<Collection>().unwrap_err();
        assert!(err.to_string().contains("unknown collection 'guests'"));
    }

    #[test]
    fn as_str_roundtrips_through_from_str() {
        for collection in Collection::BUSINESS {
            assert_eq!(collection.as_str().parse::<Collection>().unwrap(), *collection);
        }
    }

    #[test]
    fn serde_name_matches_storage_name() {
        for collection in Collection::BUSINESS {
            let json = serde_json::to_value(collection).unwrap();
            assert_eq!(json, collection.as_str());
        }
    }

    #[test]
    fn internal_and_financial_collections_hidden_from_portal() {
        assert!(!Collection::Integrations.portal_visible());
        assert!(!Collection::Expenses.portal_visible());
        assert!(!Collection::Vendors.portal_visible());
        assert!(Collection::Invoices.portal_visible());
    }
}
