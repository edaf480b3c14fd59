//! Article repository and stock adjustments.

use noces_core::entities::Article;
use noces_core::errors::CoreError;
use noces_core::validation::{apply_stock_delta, require_non_blank, validate_unit_price};
use serde_json::Value;

use super::{to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::stock::{ArticleUpdate, NewArticle};

fn validate_article(article: &Article) -> Result<(), CoreError> {
    require_non_blank("name", &article.name)?;
    validate_unit_price(article.unit_price_cents)
}

impl NocesService {
    pub async fn create_article(&self, input: NewArticle) -> Result<Article, DatabaseError> {
        require_non_blank("name", &input.name)?;
        validate_unit_price(input.unit_price_cents)?;
        self.create_entity(Value::Object(to_body(&input)?)).await
    }

    pub async fn get_article(&self, id: &str) -> Result<Article, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_articles(&self, query: &Query) -> Result<Vec<Article>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_article(
        &self,
        id: &str,
        update: ArticleUpdate,
    ) -> Result<Article, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_article)
            .await
    }

    pub async fn delete_article(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Article>(id).await
    }

    /// Add (positive `delta`) or remove (negative) units of stock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if stock would go negative; the
    /// article is left unchanged.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> Result<Article, DatabaseError> {
        let article: Article = self
            .modify_entity(id, |article: &mut Article| {
                article.stock = apply_stock_delta(article.stock, delta)?;
                Ok(())
            })
            .await?;
        tracing::debug!(id, delta, stock = article.stock, "stock adjusted");
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;

    async fn chairs(svc: &NocesService) -> Article {
        svc.create_article(NewArticle {
            name: "Chaise Napoléon".into(),
            unit_price_cents: 450,
            stock: 10,
            ..NewArticle::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn adjust_stock_up_and_down() {
        let svc = test_service().await;
        let article = chairs(&svc).await;
        assert!(article.id.starts_with("art-"));

        assert_eq!(svc.adjust_stock(&article.id, 5).await.unwrap().stock, 15);
        assert_eq!(svc.adjust_stock(&article.id, -15).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn stock_never_goes_negative() {
        let svc = test_service().await;
        let article = chairs(&svc).await;

        let err = svc.adjust_stock(&article.id, -11).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(ref m) if m.contains("insufficient stock")));
        assert_eq!(svc.get_article(&article.id).await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn negative_price_rejected() {
        let svc = test_service().await;
        let err = svc
            .create_article(NewArticle {
                name: "Nappe".into(),
                unit_price_cents: -1,
                ..NewArticle::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));

        let article = chairs(&svc).await;
        let err = svc
            .update_article(
                &article.id,
                ArticleUpdate {
                    unit_price_cents: Some(-5),
                    ..ArticleUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }
}
