//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eshop_core::{CategoryId, ProductId};

use super::category::Category;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Long-form (rich text) description.
    pub rich_description: String,
    /// URL of the main product image.
    pub image: String,
    /// Gallery image URLs, in display order.
    pub images: Vec<String>,
    /// Brand name.
    pub brand: String,
    /// Unit price. Non-negative.
    pub price: Decimal,
    /// Category this product belongs to.
    pub category: CategoryId,
    /// Units in stock. Informational only - not decremented by orders.
    pub count_in_stock: i32,
    /// Average review rating.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub num_reviews: i32,
    /// Whether the product is featured on the home page.
    pub is_featured: bool,
    /// When the product was added to the catalog.
    pub date_created: DateTime<Utc>,
}

/// A product with its category expanded into the full record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    pub images: Vec<String>,
    pub brand: String,
    pub price: Decimal,
    pub category: Category,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
    pub date_created: DateTime<Utc>,
}

/// Name/description projection for lightweight listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNameDescription {
    pub name: String,
    pub description: String,
}

/// Validated input for creating a product.
///
/// Built from the multipart form by the route layer; the image URL is
/// filled in after the upload passes the content-type allow-list.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    pub brand: String,
    pub price: Decimal,
    pub category: CategoryId,
    pub count_in_stock: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub is_featured: bool,
}

/// Validated input for updating a product. Absent fields keep their
/// stored value; `image` is only replaced when a new upload is present.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rich_description: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<CategoryId>,
    pub count_in_stock: Option<i32>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i32>,
    pub is_featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_casing() {
        let product = Product {
            id: ProductId::new(1),
            name: "Mug".to_string(),
            description: "A mug".to_string(),
            rich_description: String::new(),
            image: String::new(),
            images: vec![],
            brand: String::new(),
            price: Decimal::new(1999, 2),
            category: CategoryId::new(3),
            count_in_stock: 5,
            rating: 0.0,
            num_reviews: 0,
            is_featured: false,
            date_created: Utc::now(),
        };

        let json = serde_json::to_value(&product).expect("serialize");
        assert!(json.get("richDescription").is_some());
        assert!(json.get("countInStock").is_some());
        assert!(json.get("isFeatured").is_some());
        assert!(json.get("dateCreated").is_some());
        assert!(json.get("rich_description").is_none());
    }
}
