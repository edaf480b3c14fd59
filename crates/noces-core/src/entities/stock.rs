//! Stock management: articles, compositions of articles, and warehouses.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collections::Collection;

/// A rentable or consumable item held in stock.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub planner_id: String,
    pub name: String,
    pub category: Option<String>,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub stock: u32,
    pub warehouse_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Article, Collection::Articles, "article");

/// A named bundle of articles (e.g. a table setting).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Composition {
    pub id: String,
    pub planner_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<CompositionItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Composition, Collection::Compositions, "composition");

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompositionItem {
    pub article_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Warehouse {
    pub id: String,
    pub planner_id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_entity!(Warehouse, Collection::Warehouses, "warehouse");
