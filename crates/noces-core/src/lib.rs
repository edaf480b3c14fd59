//! # noces-core
//!
//! Core types, ID prefixes, validation rules and error types for Noces.
//!
//! This crate provides the foundational types shared across all Noces crates:
//! - Entity structs for every collection (clients, events, invoices, devis, ...)
//! - Status enums with state machine transitions
//! - The collection registry (names, ID prefixes, portal visibility)
//! - Tenant identity passed from auth to the document store
//! - Ad hoc invariants (positive expenses, paid <= total, ...)
//! - Money helpers for exact decimal <-> cents conversion
//! - CLI response types

pub mod collections;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod money;
pub mod responses;
pub mod sync;
pub mod validation;
