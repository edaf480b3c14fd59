//! Input types for entity creation and partial updates.
//!
//! `NewX` structs carry the caller-supplied fields of a new document; status
//! and other store-owned defaults are filled in by the repositories.
//! `XUpdate` structs have `Option` fields: only `Some` fields are written.
//! Nullable fields use `Option<Option<T>>` so `Some(None)` clears them.
//! Statuses are never part of an update; they change through the
//! `transition_*` operations.

pub mod client;
pub mod contract;
pub mod devis;
pub mod event;
pub mod expense;
pub mod integration;
pub mod invoice;
pub mod post_it;
pub mod stock;
pub mod task;
pub mod vendor;
