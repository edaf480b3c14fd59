//! # noces-db
//!
//! libSQL-backed document store for Noces.
//!
//! Every collection lives in a single `documents` table keyed by
//! `(collection, id)`; document bodies are JSON objects queried through
//! Firestore-style `field / operator / value` filters compiled to SQLite
//! JSON functions. [`service::NocesService`] adds tenant scoping on top and
//! hosts the typed repositories (`impl NocesService` blocks under `repos/`).

pub mod document;
pub mod error;
pub mod helpers;
mod migrations;
pub mod query;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Raw database handle: one libSQL database and connection.
pub struct NocesDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl NocesDb {
    /// Open a local database file, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let noces_db = Self { db, conn };
        noces_db.run_migrations().await?;
        Ok(noces_db)
    }

    /// Open a remote libSQL database (e.g., Turso) over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;

        let noces_db = Self { db, conn };
        noces_db.run_migrations().await?;
        Ok(noces_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"inv-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }
}

pub(crate) async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
