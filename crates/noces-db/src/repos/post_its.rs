//! Post-it repository.

use noces_core::entities::PostIt;
use noces_core::errors::CoreError;
use noces_core::validation::require_non_blank;
use serde_json::Value;

use super::{to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::{Direction, Query};
use crate::service::NocesService;
use crate::updates::post_it::{NewPostIt, PostItUpdate};

fn validate_post_it(post_it: &PostIt) -> Result<(), CoreError> {
    require_non_blank("content", &post_it.content)
}

impl NocesService {
    pub async fn create_post_it(&self, input: NewPostIt) -> Result<PostIt, DatabaseError> {
        require_non_blank("content", &input.content)?;
        self.create_entity(Value::Object(to_body(&input)?)).await
    }

    pub async fn get_post_it(&self, id: &str) -> Result<PostIt, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_post_its(&self, query: &Query) -> Result<Vec<PostIt>, DatabaseError> {
        self.list_entities(query).await
    }

    /// Post-its of a client, pinned first.
    pub async fn list_post_its_for_client(&self, client_id: &str) -> Result<Vec<PostIt>, DatabaseError> {
        let mut post_its = self
            .list_post_its(
                &Query::new()
                    .where_eq("client_id", client_id)
                    .order_by("created_at", Direction::Desc),
            )
            .await?;
        post_its.sort_by_key(|p| !p.pinned);
        Ok(post_its)
    }

    pub async fn update_post_it(&self, id: &str, update: PostItUpdate) -> Result<PostIt, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_post_it)
            .await
    }

    pub async fn delete_post_it(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<PostIt>(id).await
    }
}
