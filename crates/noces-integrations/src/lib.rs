//! # noces-integrations
//!
//! HTTP clients for the third parties Noces relies on:
//! - DocuSign eSignature (envelopes, recipients, JWT grant)
//! - Qonto (payment links, payments, OAuth, webhook signatures)
//! - Cloudinary (signed PDF uploads)
//!
//! Reconciliation of external state into documents is pure: the
//! `reconcile_*` functions take the current entity plus what the provider
//! reports and return a patch from `noces_core::sync`, or `None` when the
//! entity is already up to date. Writing patches is left to `noces-db`.

pub mod cloudinary;
pub mod docusign;
pub mod qonto;

mod error;
mod http;

pub use error::{IntegrationError, SignatureError};
