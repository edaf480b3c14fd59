//! Client repository: CRUD and status transitions.

use noces_core::entities::{Client, Entity};
use noces_core::enums::ClientStatus;
use noces_core::errors::CoreError;
use noces_core::validation::{require_non_blank, validate_email};
use serde_json::Value;

use super::{invalid_transition, to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::client::{ClientUpdate, NewClient};

fn validate_client(client: &Client) -> Result<(), CoreError> {
    require_non_blank("name", &client.name)?;
    if let Some(email) = &client.email {
        validate_email("email", email)?;
    }
    if let Some(email) = &client.portal_email {
        validate_email("portal_email", email)?;
    }
    if let Some(budget) = client.budget_cents
        && budget < 0
    {
        return Err(CoreError::Validation(format!(
            "budget must not be negative, got {budget} cents"
        )));
    }
    Ok(())
}

impl NocesService {
    pub async fn create_client(&self, input: NewClient) -> Result<Client, DatabaseError> {
        require_non_blank("name", &input.name)?;
        if let Some(email) = &input.email {
            validate_email("email", email)?;
        }
        if let Some(email) = &input.portal_email {
            validate_email("portal_email", email)?;
        }
        if let Some(budget) = input.budget_cents
            && budget < 0
        {
            return Err(DatabaseError::Validation(format!(
                "budget must not be negative, got {budget} cents"
            )));
        }

        let mut body = to_body(&input)?;
        body.insert(
            "status".into(),
            serde_json::to_value(input.status.unwrap_or_default())?,
        );
        let client: Client = self.create_entity(Value::Object(body)).await?;
        tracing::debug!(id = %client.id, "client created");
        Ok(client)
    }

    pub async fn get_client(&self, id: &str) -> Result<Client, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_clients(&self, query: &Query) -> Result<Vec<Client>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_client(
        &self,
        id: &str,
        update: ClientUpdate,
    ) -> Result<Client, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_client)
            .await
    }

    pub async fn delete_client(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Client>(id).await
    }

    pub async fn transition_client(
        &self,
        id: &str,
        status: ClientStatus,
    ) -> Result<Client, DatabaseError> {
        self.modify_entity(id, |client: &mut Client| {
            if !client.status.can_transition_to(status) {
                return Err(invalid_transition(Client::NAME, id, client.status, status));
            }
            client.status = status;
            Ok(())
        })
        .await
    }
}
