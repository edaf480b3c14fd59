//! Typed repositories for every Noces collection.
//!
//! Each module adds methods to `NocesService` via `impl NocesService` blocks.
//! Writes validate the entity invariants before touching the store; updates
//! re-validate the merged document.

pub mod articles;
pub mod clients;
pub mod compositions;
pub mod contracts;
pub mod devis;
pub mod events;
pub mod expenses;
pub mod integrations;
pub mod invoices;
pub mod portal;
pub mod post_its;
pub mod tasks;
pub mod vendors;
pub mod warehouses;

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::into_body;
use crate::error::DatabaseError;

/// Serialize an input struct into a document body.
pub(crate) fn to_body<T: Serialize>(input: &T) -> Result<Map<String, Value>, DatabaseError> {
    into_body(serde_json::to_value(input)?)
}

/// Serialize an input struct into a patch object.
pub(crate) fn to_patch<T: Serialize>(update: &T) -> Result<Value, DatabaseError> {
    Ok(serde_json::to_value(update)?)
}

pub(crate) fn invalid_transition(
    entity: &str,
    id: &str,
    from: impl Display,
    to: impl Display,
) -> DatabaseError {
    DatabaseError::InvalidTransition {
        entity: entity.to_string(),
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
    }
}
