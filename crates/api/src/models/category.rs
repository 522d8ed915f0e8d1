//! Category domain models.

use serde::{Deserialize, Serialize};

use eshop_core::CategoryId;

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Icon token shown by clients.
    pub icon: String,
    /// Display color (e.g. `#55879a`).
    pub color: String,
}

/// Input for creating a new category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    /// Display name.
    pub name: String,
    /// Icon token shown by clients.
    #[serde(default)]
    pub icon: String,
    /// Display color.
    #[serde(default)]
    pub color: String,
}

/// Input for updating a category. Absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}
