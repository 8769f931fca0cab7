// Product domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Catalog status of a product. Serialized upper-case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    /// Listed and purchasable.
    #[default]
    Active,
    /// Soft-deleted.
    Deleted,
    /// Temporarily withdrawn.
    Suspended,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "ACTIVE"),
            ProductStatus::Deleted => write!(f, "DELETED"),
            ProductStatus::Suspended => write!(f, "SUSPENDED"),
        }
    }
}

/// Product - an item in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Product {
    /// Unique identifier for the product.
    pub id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "Espresso Beans 1kg"))]
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    /// Image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// List price before discount.
    pub original_price: f64,
    /// Discount applied to the list price.
    pub discount_price: f64,
    /// Price charged at checkout.
    pub selling_price: f64,
    /// Units in stock.
    pub quantity: u32,
    pub unit_of_measure: u32,
    /// Harmonized System of Nomenclature code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_purchasable(&self) -> bool {
        self.status == ProductStatus::Active
    }
}
