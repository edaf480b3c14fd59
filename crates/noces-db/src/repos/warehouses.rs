//! Warehouse repository.

use noces_core::entities::{Article, Warehouse};
use noces_core::errors::CoreError;
use noces_core::validation::require_non_blank;
use serde_json::Value;

use super::{to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::stock::{NewWarehouse, WarehouseUpdate};

fn validate_warehouse(warehouse: &Warehouse) -> Result<(), CoreError> {
    require_non_blank("name", &warehouse.name)
}

impl NocesService {
    pub async fn create_warehouse(&self, input: NewWarehouse) -> Result<Warehouse, DatabaseError> {
        require_non_blank("name", &input.name)?;
        self.create_entity(Value::Object(to_body(&input)?)).await
    }

    pub async fn get_warehouse(&self, id: &str) -> Result<Warehouse, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_warehouses(&self, query: &Query) -> Result<Vec<Warehouse>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_warehouse(
        &self,
        id: &str,
        update: WarehouseUpdate,
    ) -> Result<Warehouse, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_warehouse)
            .await
    }

    pub async fn delete_warehouse(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Warehouse>(id).await
    }

    /// Articles stored in a warehouse, by name.
    pub async fn list_articles_in_warehouse(&self, id: &str) -> Result<Vec<Article>, DatabaseError> {
        let warehouse = self.get_warehouse(id).await?;
        let query = Query::new()
            .where_eq("warehouse_id", warehouse.id)
            .order_by("name", crate::query::Direction::Asc);
        self.list_articles(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use crate::updates::stock::NewArticle;

    #[tokio::test]
    async fn articles_in_warehouse() {
        let svc = test_service().await;
        let depot = svc
            .create_warehouse(NewWarehouse {
                name: "Dépôt Aix".into(),
                address: Some("12 rue des Lilas".into()),
            })
            .await
            .unwrap();
        assert!(depot.id.starts_with("whs-"));

        for name in ["Vase", "Arche"] {
            svc.create_article(NewArticle {
                name: name.into(),
                unit_price_cents: 100,
                warehouse_id: Some(depot.id.clone()),
                ..NewArticle::default()
            })
            .await
            .unwrap();
        }
        svc.create_article(NewArticle {
            name: "Nappe".into(),
            unit_price_cents: 100,
            ..NewArticle::default()
        })
        .await
        .unwrap();

        let stored = svc.list_articles_in_warehouse(&depot.id).await.unwrap();
        let names: Vec<&str> = stored.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Arche", "Vase"]);
    }

    #[tokio::test]
    async fn unknown_warehouse_is_not_found() {
        let svc = test_service().await;
        let err = svc.list_articles_in_warehouse("whs-missing").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
