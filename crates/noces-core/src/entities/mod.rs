//! Entity structs for every Noces collection.
//!
//! Each entity is the typed view of one document: the JSON `data` of the
//! document plus the store-managed `id`, `created_at` and `updated_at`.
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation. Unknown document fields are ignored when
//! reading and kept untouched in the store.

macro_rules! impl_entity {
    ($ty:ty, $collection:expr, $name:literal) => {
        impl $crate::entities::Entity for $ty {
            const COLLECTION: $crate::collections::Collection = $collection;
            const NAME: &'static str = $name;

            fn id(&self) -> &str {
                &self.id
            }

            fn planner_id(&self) -> &str {
                &self.planner_id
            }
        }
    };
}

mod client;
mod contract;
mod devis;
mod event;
mod expense;
mod integration;
mod invoice;
mod line_item;
mod post_it;
mod signature;
mod stock;
mod task;
mod vendor;

pub use client::Client;
pub use contract::Contract;
pub use devis::Devis;
pub use event::Event;
pub use expense::Expense;
pub use integration::IntegrationCredentials;
pub use invoice::Invoice;
pub use line_item::{LineItem, items_total};
pub use post_it::PostIt;
pub use signature::{SignatureTracking, Signer};
pub use stock::{Article, Composition, CompositionItem, Warehouse};
pub use task::Task;
pub use vendor::Vendor;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::collections::Collection;

/// A typed document stored in a known collection.
pub trait Entity: Serialize + DeserializeOwned {
    /// Collection the entity is stored in.
    const COLLECTION: Collection;

    /// Human-readable entity name used in error messages.
    const NAME: &'static str;

    fn id(&self) -> &str;

    fn planner_id(&self) -> &str;
}
