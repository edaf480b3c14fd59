//! Shared test utilities for noces-db unit tests.

use noces_core::identity::Identity;

use crate::NocesDb;
use crate::service::NocesService;

/// In-memory service without identity (local mode).
pub async fn test_service() -> NocesService {
    let db = NocesDb::open_local(":memory:").await.unwrap();
    NocesService::from_db(db, None)
}

/// In-memory service scoped to a planner.
pub async fn planner_service(planner_id: &str) -> NocesService {
    test_service_with_identity(Identity::Planner {
        planner_id: planner_id.to_string(),
    })
    .await
}

pub async fn test_service_with_identity(identity: Identity) -> NocesService {
    let db = NocesDb::open_local(":memory:").await.unwrap();
    NocesService::from_db(db, Some(identity))
}
