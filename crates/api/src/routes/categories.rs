//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use eshop_core::CategoryId;

use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::category::{Category, CreateCategoryInput, UpdateCategoryInput};
use crate::state::AppState;

/// List all categories.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// Get a category by id.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("category".to_owned()))
}

/// Create a category.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCategoryInput>,
) -> Result<Json<Category>> {
    if input.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_owned()));
    }

    let category = CategoryRepository::new(state.pool()).create(&input).await?;
    Ok(Json(category))
}

/// Update a category. Absent fields keep their stored value.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<Category>> {
    let category = CategoryRepository::new(state.pool())
        .update(id, &input)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                ApiError::Validation("the category does not exist".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(category))
}

/// Delete a category.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    CategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("category".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "the category was deleted"
    })))
}
