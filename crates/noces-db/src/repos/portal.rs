//! Client portal: everything a client can see about their wedding.

use noces_core::entities::Client;
use noces_core::identity::Identity;
use noces_core::responses::PortalOverview;

use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;

impl NocesService {
    /// Read-only overview of one client.
    ///
    /// A portal identity always sees its own client and cannot ask for
    /// another one; planners and local mode must name the client.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Forbidden` when a portal identity asks for
    /// another client, `DatabaseError::Validation` when no client is named,
    /// and `DatabaseError::NotFound` for unknown clients.
    pub async fn portal_overview(&self, client_id: Option<&str>) -> Result<PortalOverview, DatabaseError> {
        let client_id = match (self.identity(), client_id) {
            (Some(Identity::Client { client_id: own, .. }), requested) => {
                if let Some(requested) = requested
                    && requested != own
                {
                    return Err(DatabaseError::Forbidden(format!(
                        "client portal cannot read client {requested}"
                    )));
                }
                own.clone()
            }
            (_, Some(requested)) => requested.to_string(),
            (_, None) => {
                return Err(DatabaseError::Validation(
                    "a client id is required outside the client portal".into(),
                ));
            }
        };

        let client: Client = self.get_entity(&client_id).await?;
        let own = Query::new().where_eq("client_id", client_id.as_str());

        Ok(PortalOverview {
            event: self.get_event_for_client(&client.id).await?,
            tasks: self.list_tasks(&own).await?,
            invoices: self.list_invoices(&own).await?,
            devis: self.list_devis(&own).await?,
            contracts: self.list_contracts(&own).await?,
            post_its: self.list_post_its_for_client(&client.id).await?,
            client,
        })
    }
}
