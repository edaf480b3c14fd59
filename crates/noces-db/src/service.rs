//! Tenant-scoped document access.
//!
//! `NocesService` wraps `NocesDb` (raw database access) and the optional
//! [`Identity`] of the caller. Every document operation goes through the
//! scope of that identity:
//!
//! - planner: reads are filtered on `planner_id`, writes stamp it, and other
//!   tenants' documents look like they do not exist;
//! - client (portal): read-only access to the portal-visible collections,
//!   restricted to the client's own documents;
//! - none (local mode): unscoped, new documents are stamped with the local
//!   planner ID.
//!
//! Typed repositories are implemented as `impl NocesService` blocks under
//! `repos/`.

use chrono::{DateTime, SubsecRound, Utc};
use noces_core::collections::Collection;
use noces_core::entities::Entity;
use noces_core::errors::CoreError;
use noces_core::identity::{AuthAccount, Identity, LOCAL_PLANNER_ID};
use serde_json::{Map, Value};

use crate::NocesDb;
use crate::document::{Document, apply_patch, deep_merge, into_body};
use crate::error::DatabaseError;
use crate::helpers::format_datetime;
use crate::query::{Filter, Query, compile};

const SELECT_COLS: &str = "id, data, created_at, updated_at";

pub struct NocesService {
    db: NocesDb,
    identity: Option<Identity>,
}

impl NocesService {
    /// Create a service over a local database file (or `":memory:"`).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(path: &str, identity: Option<Identity>) -> Result<Self, DatabaseError> {
        let db = NocesDb::open_local(path).await?;
        Ok(Self { db, identity })
    }

    /// Create a service over a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection fails.
    pub async fn new_remote(
        url: &str,
        auth_token: &str,
        identity: Option<Identity>,
    ) -> Result<Self, DatabaseError> {
        let db = NocesDb::open_remote(url, auth_token).await?;
        Ok(Self { db, identity })
    }

    #[must_use]
    pub const fn from_db(db: NocesDb, identity: Option<Identity>) -> Self {
        Self { db, identity }
    }

    #[must_use]
    pub const fn db(&self) -> &NocesDb {
        &self.db
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity;
    }

    /// Map an authenticated account to a tenant identity.
    ///
    /// An account whose email is some client's `portal_email` gets that
    /// client's portal identity; any other account is a planner keyed by uid.
    /// The lookup is unscoped: it runs before any identity is known.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the client lookup fails.
    pub async fn resolve_identity(&self, account: &AuthAccount) -> Result<Identity, DatabaseError> {
        if let Some(email) = account.email.as_deref().map(str::trim)
            && !email.is_empty()
        {
            let query = Query::new().where_eq("portal_email", email).limit(1);
            let matches = query_documents(self.db.conn(), Collection::Clients, &query, &[]).await?;
            if let Some(client) = matches.into_iter().next() {
                tracing::debug!(client_id = %client.id, "signed in as client portal user");
                return Ok(Identity::Client {
                    planner_id: client.planner_id().unwrap_or(LOCAL_PLANNER_ID).to_string(),
                    client_id: client.id,
                });
            }
        }
        Ok(Identity::Planner {
            planner_id: account.uid.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Scoping
    // -----------------------------------------------------------------------

    /// Filters every read in `collection` must carry.
    fn read_scope(&self, collection: Collection) -> Result<Vec<Filter>, DatabaseError> {
        match &self.identity {
            None => Ok(Vec::new()),
            Some(Identity::Planner { planner_id }) => {
                Ok(vec![Filter::eq("planner_id", planner_id.as_str())])
            }
            Some(Identity::Client {
                planner_id,
                client_id,
            }) => {
                if !collection.portal_visible() {
                    return Err(DatabaseError::Forbidden(format!(
                        "{collection} is not available in the client portal"
                    )));
                }
                let own = if collection == Collection::Clients {
                    Filter::eq("id", client_id.as_str())
                } else {
                    Filter::eq("client_id", client_id.as_str())
                };
                Ok(vec![Filter::eq("planner_id", planner_id.as_str()), own])
            }
        }
    }

    pub(crate) fn ensure_writable(&self, collection: Collection) -> Result<(), DatabaseError> {
        if self.identity.as_ref().is_some_and(Identity::is_portal) {
            return Err(DatabaseError::Forbidden(format!(
                "the client portal is read-only ({collection})"
            )));
        }
        Ok(())
    }

    pub(crate) fn is_visible(&self, doc: &Document) -> bool {
        match &self.identity {
            None => true,
            Some(Identity::Planner { planner_id }) => doc.planner_id() == Some(planner_id),
            Some(Identity::Client {
                planner_id,
                client_id,
            }) => {
                let own = if doc.collection == Collection::Clients {
                    doc.id == *client_id
                } else {
                    doc.get_str("client_id") == Some(client_id)
                };
                doc.collection.portal_visible() && doc.planner_id() == Some(planner_id) && own
            }
        }
    }

    /// Stamp the tenant on a new document body.
    pub(crate) fn stamp_owner(&self, data: &mut Map<String, Value>) {
        match &self.identity {
            Some(identity) => {
                data.insert("planner_id".into(), identity.planner_id().into());
            }
            None => {
                if !data.get("planner_id").is_some_and(Value::is_string) {
                    data.insert("planner_id".into(), LOCAL_PLANNER_ID.into());
                }
            }
        }
    }

    /// Keep the owner of an existing document; writes never move documents
    /// between tenants.
    fn keep_owner(&self, existing: &Document, data: &mut Map<String, Value>) {
        match existing.planner_id() {
            Some(owner) => {
                data.insert("planner_id".into(), owner.into());
            }
            None => self.stamp_owner(data),
        }
    }

    // -----------------------------------------------------------------------
    // Generic document operations
    // -----------------------------------------------------------------------

    /// Documents of `collection` matching `query`, within the caller's scope.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidFilter` for malformed filters and
    /// `DatabaseError::Forbidden` for collections hidden from the portal.
    pub async fn get_documents(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, DatabaseError> {
        let scope = self.read_scope(collection)?;
        tracing::debug!(%collection, filters = query.filters.len(), "get_documents");
        query_documents(self.db.conn(), collection, query, &scope).await
    }

    /// One document by ID, `None` if missing or outside the caller's scope.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` for collections hidden from the portal.
    pub async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, DatabaseError> {
        self.read_scope(collection)?;
        let doc = fetch(self.db.conn(), collection, id).await?;
        Ok(doc.filter(|doc| self.is_visible(doc)))
    }

    /// Insert a new document with a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if `data` is not a JSON object and
    /// `DatabaseError::Forbidden` for portal identities.
    pub async fn add_document(
        &self,
        collection: Collection,
        data: Value,
    ) -> Result<Document, DatabaseError> {
        self.ensure_writable(collection)?;
        let mut body = into_body(data)?;
        self.stamp_owner(&mut body);
        let id = self.db.generate_id(collection.id_prefix()).await?;
        let doc = insert(self.db.conn(), collection, &id, body).await?;
        tracing::debug!(%collection, id = %doc.id, "document added");
        Ok(doc)
    }

    /// Create or overwrite the document `id`. With `merge`, nested objects
    /// are merged into the existing document instead of replacing it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the ID belongs to another tenant,
    /// `DatabaseError::Validation` if `data` is not an object, and
    /// `DatabaseError::Forbidden` for portal identities.
    pub async fn set_document(
        &self,
        collection: Collection,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<Document, DatabaseError> {
        self.ensure_writable(collection)?;
        let body = into_body(data)?;

        let tx = self.db.conn().transaction().await?;
        let result = async {
            match fetch(&tx, collection, id).await? {
                Some(existing) if !self.is_visible(&existing) => {
                    Err(DatabaseError::not_found(collection, id))
                }
                Some(existing) => {
                    let mut data = if merge {
                        let mut data = existing.data.clone();
                        deep_merge(&mut data, body);
                        data
                    } else {
                        body
                    };
                    self.keep_owner(&existing, &mut data);
                    write(&tx, &existing, data).await
                }
                None => {
                    let mut data = body;
                    self.stamp_owner(&mut data);
                    insert(&tx, collection, id, data).await
                }
            }
        }
        .await;
        finish(tx, result).await
    }

    /// Patch an existing document. Top-level keys replace, dotted keys set
    /// nested fields.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the document does not exist in
    /// the caller's scope, `DatabaseError::Validation` if `patch` is not an
    /// object, and `DatabaseError::Forbidden` for portal identities.
    pub async fn update_document(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<Document, DatabaseError> {
        let patch = into_body(patch)?;
        self.mutate(collection, id, |_, data| apply_patch(data, patch))
            .await
    }

    /// Delete a document. Deleting a missing (or foreign) document is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` for portal identities.
    pub async fn delete_document(&self, collection: Collection, id: &str) -> Result<(), DatabaseError> {
        self.ensure_writable(collection)?;
        let Some(existing) = fetch(self.db.conn(), collection, id).await? else {
            return Ok(());
        };
        if !self.is_visible(&existing) {
            tracing::debug!(%collection, id, "delete of a document outside scope ignored");
            return Ok(());
        }
        self.db
            .conn()
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                libsql::params![collection.as_str(), id],
            )
            .await?;
        tracing::debug!(%collection, id, "document deleted");
        Ok(())
    }

    /// Read-modify-write one document inside a transaction.
    ///
    /// `mutate` receives the current document and a copy of its data to
    /// change. Nothing is written if it returns an error.
    pub(crate) async fn mutate<F>(
        &self,
        collection: Collection,
        id: &str,
        mutate: F,
    ) -> Result<Document, DatabaseError>
    where
        F: FnOnce(&Document, &mut Map<String, Value>) -> Result<(), DatabaseError>,
    {
        self.ensure_writable(collection)?;

        let tx = self.db.conn().transaction().await?;
        let result = async {
            let existing = fetch(&tx, collection, id)
                .await?
                .filter(|doc| self.is_visible(doc))
                .ok_or_else(|| DatabaseError::not_found(collection, id))?;
            let mut data = existing.data.clone();
            mutate(&existing, &mut data)?;
            self.keep_owner(&existing, &mut data);
            write(&tx, &existing, data).await
        }
        .await;
        finish(tx, result).await
    }

    // -----------------------------------------------------------------------
    // Typed entity helpers used by the repositories
    // -----------------------------------------------------------------------

    /// Insert a new entity from its input body.
    pub(crate) async fn create_entity<T: Entity>(&self, data: Value) -> Result<T, DatabaseError> {
        self.add_document(T::COLLECTION, data)
            .await?
            .into_entity()
    }

    /// Fetch an entity, `NotFound` if it does not exist in scope.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` or a read error.
    pub async fn get_entity<T: Entity>(&self, id: &str) -> Result<T, DatabaseError> {
        self.get_document(T::COLLECTION, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(T::NAME, id))?
            .into_entity()
    }

    /// List entities matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidFilter` for malformed filters, or a read error.
    pub async fn list_entities<T: Entity>(&self, query: &Query) -> Result<Vec<T>, DatabaseError> {
        self.get_documents(T::COLLECTION, query)
            .await?
            .into_iter()
            .map(Document::into_entity)
            .collect()
    }

    /// Apply a partial patch and validate the merged entity before writing.
    pub(crate) async fn patch_entity<T, V>(
        &self,
        id: &str,
        patch: Value,
        validate: V,
    ) -> Result<T, DatabaseError>
    where
        T: Entity,
        V: FnOnce(&T) -> Result<(), CoreError>,
    {
        let patch = into_body(patch)?;
        self.mutate(T::COLLECTION, id, |existing, data| {
            apply_patch(data, patch)?;
            let merged = Document {
                data: data.clone(),
                ..existing.clone()
            };
            let entity: T = merged.deserialize().map_err(|e| {
                DatabaseError::Validation(format!("update does not fit a {}: {e}", T::NAME))
            })?;
            validate(&entity)?;
            Ok(())
        })
        .await
        .map_err(|e| rename_not_found(e, T::NAME))?
        .into_entity()
    }

    /// Load an entity, let `change` edit it, and write the result back.
    /// Fields unknown to `T` are preserved.
    pub(crate) async fn modify_entity<T, F>(&self, id: &str, change: F) -> Result<T, DatabaseError>
    where
        T: Entity,
        F: FnOnce(&mut T) -> Result<(), DatabaseError>,
    {
        self.mutate(T::COLLECTION, id, |existing, data| {
            let mut entity: T = existing.deserialize()?;
            change(&mut entity)?;
            let body = into_body(serde_json::to_value(&entity)?)?;
            for (key, value) in body {
                data.insert(key, value);
            }
            Ok(())
        })
        .await
        .map_err(|e| rename_not_found(e, T::NAME))?
        .into_entity()
    }

    /// Delete an entity by ID (idempotent).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` for portal identities.
    pub async fn delete_entity<T: Entity>(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_document(T::COLLECTION, id).await
    }
}

fn rename_not_found(error: DatabaseError, entity: &str) -> DatabaseError {
    match error {
        DatabaseError::NotFound { id, .. } => DatabaseError::not_found(entity, id),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Connection-level statements, shared by plain calls and transactions
// ---------------------------------------------------------------------------

pub(crate) async fn query_documents(
    conn: &libsql::Connection,
    collection: Collection,
    query: &Query,
    scope: &[Filter],
) -> Result<Vec<Document>, DatabaseError> {
    let compiled = compile(collection, query, scope)?;
    let sql = format!("SELECT {SELECT_COLS} FROM documents WHERE {}", compiled.sql);
    let mut rows = conn
        .query(&sql, libsql::params_from_iter(compiled.params))
        .await?;
    let mut docs = Vec::new();
    while let Some(row) = rows.next().await? {
        docs.push(Document::from_row(collection, &row)?);
    }
    Ok(docs)
}

pub(crate) async fn fetch(
    conn: &libsql::Connection,
    collection: Collection,
    id: &str,
) -> Result<Option<Document>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM documents WHERE collection = ?1 AND id = ?2"),
            libsql::params![collection.as_str(), id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(Document::from_row(collection, &row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert(
    conn: &libsql::Connection,
    collection: Collection,
    id: &str,
    data: Map<String, Value>,
) -> Result<Document, DatabaseError> {
    let now = stored_now();
    let json = serde_json::to_string(&data)?;
    conn.execute(
        "INSERT INTO documents (collection, id, data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            collection.as_str(),
            id,
            json,
            format_datetime(now),
            format_datetime(now)
        ],
    )
    .await?;
    Ok(Document {
        id: id.to_string(),
        collection,
        data,
        created_at: now,
        updated_at: now,
    })
}

pub(crate) async fn write(
    conn: &libsql::Connection,
    existing: &Document,
    data: Map<String, Value>,
) -> Result<Document, DatabaseError> {
    let now = stored_now();
    let json = serde_json::to_string(&data)?;
    conn.execute(
        "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
        libsql::params![
            json,
            format_datetime(now),
            existing.collection.as_str(),
            existing.id.as_str()
        ],
    )
    .await?;
    Ok(Document {
        id: existing.id.clone(),
        collection: existing.collection,
        data,
        created_at: existing.created_at,
        updated_at: now,
    })
}

/// Current time at the precision timestamps are stored with.
fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Commit on success, roll back on error.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            tx.rollback().await?;
            Err(error)
        }
    }
}
