//! Composition repository: bundles of articles and their cost.

use noces_core::entities::{Article, Composition};
use noces_core::errors::CoreError;
use noces_core::responses::CompositionCost;
use noces_core::validation::{require_non_blank, validate_composition_items};
use serde_json::Value;

use super::{to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::{FilterOp, Query};
use crate::service::NocesService;
use crate::updates::stock::{CompositionUpdate, NewComposition};

fn validate_composition(composition: &Composition) -> Result<(), CoreError> {
    require_non_blank("name", &composition.name)?;
    validate_composition_items(&composition.items)
}

impl NocesService {
    pub async fn create_composition(
        &self,
        input: NewComposition,
    ) -> Result<Composition, DatabaseError> {
        require_non_blank("name", &input.name)?;
        validate_composition_items(&input.items)?;
        self.create_entity(Value::Object(to_body(&input)?)).await
    }

    pub async fn get_composition(&self, id: &str) -> Result<Composition, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_compositions(&self, query: &Query) -> Result<Vec<Composition>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_composition(
        &self,
        id: &str,
        update: CompositionUpdate,
    ) -> Result<Composition, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_composition)
            .await
    }

    pub async fn delete_composition(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Composition>(id).await
    }

    /// Sum of `unit_price x quantity` over the composition's articles.
    /// Articles that no longer exist are listed instead of failing.
    pub async fn composition_cost(&self, id: &str) -> Result<CompositionCost, DatabaseError> {
        let composition = self.get_composition(id).await?;
        let mut cost = CompositionCost {
            composition_id: composition.id.clone(),
            total_cents: 0,
            missing_articles: Vec::new(),
        };
        if composition.items.is_empty() {
            return Ok(cost);
        }

        let mut articles = Vec::new();
        for chunk in composition.items.chunks(crate::query::MAX_DISJUNCTION) {
            let ids: Vec<&str> = chunk.iter().map(|item| item.article_id.as_str()).collect();
            let query = Query::new().where_op("id", FilterOp::In, ids);
            articles.extend(self.list_entities::<Article>(&query).await?);
        }

        for item in &composition.items {
            let Some(article) = articles.iter().find(|a| a.id == item.article_id) else {
                cost.missing_articles.push(item.article_id.clone());
                continue;
            };
            let line = article
                .unit_price_cents
                .checked_mul(i64::from(item.quantity))
                .and_then(|line| cost.total_cents.checked_add(line))
                .ok_or_else(|| DatabaseError::Validation("composition cost overflows".into()))?;
            cost.total_cents = line;
        }
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;
    use crate::updates::stock::NewArticle;
    use noces_core::entities::CompositionItem;

    async fn article(svc: &NocesService, name: &str, price: i64) -> String {
        svc.create_article(NewArticle {
            name: name.into(),
            unit_price_cents: price,
            stock: 50,
            ..NewArticle::default()
        })
        .await
        .unwrap()
        .id
    }

    fn item(article_id: &str, quantity: u32) -> CompositionItem {
        CompositionItem {
            article_id: article_id.into(),
            quantity,
        }
    }

    #[tokio::test]
    async fn cost_sums_articles_and_reports_missing() {
        let svc = test_service().await;
        let vase = article(&svc, "Vase", 1_200).await;
        let candle = article(&svc, "Bougie", 300).await;

        let composition = svc
            .create_composition(NewComposition {
                name: "Centre de table".into(),
                description: None,
                items: vec![item(&vase, 1), item(&candle, 3), item("art-gone", 2)],
            })
            .await
            .unwrap();
        assert!(composition.id.starts_with("cmp-"));

        let cost = svc.composition_cost(&composition.id).await.unwrap();
        assert_eq!(cost.total_cents, 2_100);
        assert_eq!(cost.missing_articles, vec!["art-gone".to_string()]);
    }

    #[tokio::test]
    async fn empty_composition_costs_nothing() {
        let svc = test_service().await;
        let composition = svc
            .create_composition(NewComposition {
                name: "Vide".into(),
                ..NewComposition::default()
            })
            .await
            .unwrap();
        let cost = svc.composition_cost(&composition.id).await.unwrap();
        assert_eq!(cost.total_cents, 0);
        assert!(cost.missing_articles.is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_rejected() {
        let svc = test_service().await;
        let err = svc
            .create_composition(NewComposition {
                name: "Arche".into(),
                description: None,
                items: vec![item("art-1", 0)],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }
}
