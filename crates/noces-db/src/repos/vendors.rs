//! Vendor repository.

use noces_core::entities::Vendor;
use noces_core::errors::CoreError;
use noces_core::validation::{require_non_blank, validate_email};
use serde_json::Value;

use super::{to_body, to_patch};
use crate::error::DatabaseError;
use crate::query::Query;
use crate::service::NocesService;
use crate::updates::vendor::{NewVendor, VendorUpdate};

fn validate_vendor(vendor: &Vendor) -> Result<(), CoreError> {
    require_non_blank("name", &vendor.name)?;
    if let Some(email) = &vendor.email {
        validate_email("email", email)?;
    }
    Ok(())
}

impl NocesService {
    pub async fn create_vendor(&self, input: NewVendor) -> Result<Vendor, DatabaseError> {
        require_non_blank("name", &input.name)?;
        if let Some(email) = &input.email {
            validate_email("email", email)?;
        }
        self.create_entity(Value::Object(to_body(&input)?)).await
    }

    pub async fn get_vendor(&self, id: &str) -> Result<Vendor, DatabaseError> {
        self.get_entity(id).await
    }

    pub async fn list_vendors(&self, query: &Query) -> Result<Vec<Vendor>, DatabaseError> {
        self.list_entities(query).await
    }

    pub async fn update_vendor(&self, id: &str, update: VendorUpdate) -> Result<Vendor, DatabaseError> {
        self.patch_entity(id, to_patch(&update)?, validate_vendor)
            .await
    }

    pub async fn delete_vendor(&self, id: &str) -> Result<(), DatabaseError> {
        self.delete_entity::<Vendor>(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_service;

    #[tokio::test]
    async fn vendor_crud() {
        let svc = test_service().await;
        let vendor = svc
            .create_vendor(NewVendor {
                name: "Fleurs de Provence".into(),
                category: Some("florist".into()),
                ..NewVendor::default()
            })
            .await
            .unwrap();
        assert!(vendor.id.starts_with("vnd-"));

        let florists = svc
            .list_vendors(&Query::new().where_eq("category", "florist"))
            .await
            .unwrap();
        assert_eq!(florists.len(), 1);

        let updated = svc
            .update_vendor(
                &vendor.id,
                VendorUpdate {
                    website: Some(Some("https://fleurs.example".into())),
                    ..VendorUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.website.as_deref(), Some("https://fleurs.example"));

        svc.delete_vendor(&vendor.id).await.unwrap();
        assert!(svc.list_vendors(&Query::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn vendor_email_is_checked_on_update() {
        let svc = test_service().await;
        let vendor = svc
            .create_vendor(NewVendor {
                name: "DJ Max".into(),
                ..NewVendor::default()
            })
            .await
            .unwrap();
        let err = svc
            .update_vendor(
                &vendor.id,
                VendorUpdate {
                    email: Some(Some("max@".into())),
                    ..VendorUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }
}
