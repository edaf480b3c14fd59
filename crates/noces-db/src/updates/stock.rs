//! Article, composition and warehouse inputs.

use noces_core::entities::CompositionItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewArticle {
    pub name: String,
    pub category: Option<String>,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub stock: u32,
    pub warehouse_id: Option<String>,
}

/// Stock changes go through `adjust_stock`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComposition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<CompositionItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CompositionItem>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWarehouse {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
}
