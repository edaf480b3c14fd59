//! Event repository. A client has at most one event.

use noces_core::entities::{Client, Entity, Event};
use noces_core::enums::EventStatus;
use noces_core::errors::CoreError;
use noces_core::validation::require_non_blank;
use serde_json::Value;

use super::{invalid_transition, to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::event::{EventUpdate, NewEvent};

fn validate_event(event: &Event) -> Result<(), CoreError> {
    require_non_blank("title", &event.title)
}

impl NocesService {
    /// Create the event of a client.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the client does not exist and
    /// `DatabaseError::Validation` if the client already has an event.
    pub async fn create_event(&self, input: NewEvent) -> Result<Event, DatabaseError> {
        require_non_blank("title", &input.title)?;
        let client: Client = self.get_entity(&input.client_id).await?;
        if let Some(existing) = self.get_event_for_client(&client.id).await? {
            return Err(DatabaseError::Validation(format!(
                "client {} already has an event ({})",
                client.id, existing.id
            )));
        }

        let mut body = to_body(&input)?;
        body.insert("status".into(), serde_json::to_value(EventStatus::Planned)?);
        let event: Event = self.create_entity(Value::Object(body)).await?;
        tracing::debug!(id = %event.id, client_id = %event.client_id, "event created");
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> Result<Event, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn get_event_for_client(&self, client_id: &str) -> Result<Option<Event>, DatabaseError> {
        let query = Query::new().where_eq("client_id", client_id).limit(1);
        Ok(self.list_entities(&query).await?.into_iter().next())
    }

    pub async fn list_events(&self, query: &Query) -> Result<Vec<Event>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_event(&self, id: &str, update: EventUpdate) -> Result<Event, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_event)
            .await
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Event>(id).await
    }

    pub async fn transition_event(
        &self,
        id: &str,
        status: EventStatus,
    ) -> Result<Event, DatabaseError> {
        self.modify_entity(id, |event: &mut Event| {
            if !event.status.can_transition_to(status) {
                return Err(invalid_transition(Event::NAME, id, event.status, status));
            }
            event.status = status;
            Ok(())
        })
        .await
    }
}
