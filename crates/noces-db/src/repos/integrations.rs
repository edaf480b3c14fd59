//! Per-planner OAuth credentials (`integrations` collection).
//!
//! One document per provider and planner, with ID `<provider>:<planner_id>`.

use noces_core::collections::Collection;
use noces_core::entities::IntegrationCredentials;
use noces_core::identity::LOCAL_PLANNER_ID;
use noces_core::validation::require_non_blank;
use serde_json::Value;

use super::to_body;
use crate::error::DatabaseError;
use crate::service::NocesService;
use crate::updates::integration::NewIntegrationCredentials;

impl NocesService {
    fn credentials_owner(&self) -> &str {
        self.identity()
            .map_or(LOCAL_PLANNER_ID, |identity| identity.planner_id())
    }

    /// Stored credentials of the current planner for `provider`, if any.
    pub async fn get_integration_credentials(
        &self,
        provider: &str,
    ) -> Result<Option<IntegrationCredentials>, DatabaseError> {
        let id = IntegrationCredentials::document_id(provider, self.credentials_owner());
        self.get_document(Collection::Integrations, &id)
            .await?
            .map(|doc| doc.into_entity())
            .transpose()
    }

    /// Store (or replace) the current planner's credentials for a provider.
    pub async fn save_integration_credentials(
        &self,
        input: NewIntegrationCredentials,
    ) -> Result<IntegrationCredentials, DatabaseError> {
        require_non_blank("provider", &input.provider)?;
        require_non_blank("access_token", &input.access_token)?;
        let id = IntegrationCredentials::document_id(&input.provider, self.credentials_owner());
        let doc = self
            .set_document(
                Collection::Integrations,
                &id,
                Value::Object(to_body(&input)?),
                false,
            )
            .await?;
        tracing::debug!(provider = %input.provider, "integration credentials saved");
        doc.into_entity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{planner_service, test_service};
    use noces_core::identity::Identity;

    fn qonto_tokens(access_token: &str) -> NewIntegrationCredentials {
        NewIntegrationCredentials {
            provider: "qonto".into(),
            access_token: access_token.into(),
            refresh_token: Some("refresh-1".into()),
            expires_at: None,
            scope: Some("payment_link.write".into()),
        }
    }

    #[tokio::test]
    async fn save_then_get_replaces() {
        let svc = planner_service("uid-1").await;
        assert!(svc.get_integration_credentials("qonto").await.unwrap().is_none());

        let saved = svc
            .save_integration_credentials(qonto_tokens("tok-1"))
            .await
            .unwrap();
        assert_eq!(saved.id, "qonto:uid-1");
        assert_eq!(saved.planner_id, "uid-1");

        svc.save_integration_credentials(NewIntegrationCredentials {
            refresh_token: None,
            ..qonto_tokens("tok-2")
        })
        .await
        .unwrap();
        let stored = svc.get_integration_credentials("qonto").await.unwrap().unwrap();
        assert_eq!(stored.access_token, "tok-2");
        assert!(stored.refresh_token.is_none());
    }

    #[tokio::test]
    async fn local_mode_uses_local_planner() {
        let svc = test_service().await;
        let saved = svc
            .save_integration_credentials(qonto_tokens("tok"))
            .await
            .unwrap();
        assert_eq!(saved.id, "qonto:local");
    }

    #[tokio::test]
    async fn credentials_are_per_planner() {
        let mut svc = planner_service("uid-1").await;
        svc.save_integration_credentials(qonto_tokens("tok-1"))
            .await
            .unwrap();

        svc.set_identity(Some(Identity::Planner {
            planner_id: "uid-2".into(),
        }));
        assert!(svc.get_integration_credentials("qonto").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn portal_cannot_read_credentials() {
        let mut svc = planner_service("uid-1").await;
        svc.save_integration_credentials(qonto_tokens("tok-1"))
            .await
            .unwrap();
        svc.set_identity(Some(Identity::Client {
            planner_id: "uid-1".into(),
            client_id: "cli-1".into(),
        }));
        assert!(matches!(
            svc.get_integration_credentials("qonto").await,
            Err(DatabaseError::Forbidden(_))
        ));
    }
}
