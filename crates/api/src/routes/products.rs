//! Product route handlers.
//!
//! Create and update consume multipart forms (the image travels with the
//! fields); everything else is plain JSON. The upload content-type check
//! runs before any row is written.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use eshop_core::{CategoryId, ProductId};

use crate::db::{CategoryRepository, ProductRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::product::{
    CreateProductInput, Product, ProductNameDescription, ProductWithCategory, UpdateProductInput,
};
use crate::services::uploads::{self, MAX_GALLERY_IMAGES, UploadError};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Comma-separated category ids, e.g. `?categories=1,4`.
    pub categories: Option<String>,
}

/// One file pulled out of a multipart form.
#[derive(Debug)]
struct UploadedFile {
    original_name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Everything a product multipart form can carry.
#[derive(Debug, Default)]
struct ProductForm {
    fields: HashMap<String, String>,
    image: Option<UploadedFile>,
    gallery: Vec<UploadedFile>,
}

/// Drain a multipart stream into text fields and files.
///
/// The single main image arrives under `image`; gallery uploads arrive as
/// repeated `images` parts.
async fn collect_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" | "images" => {
                let original_name = field.file_name().unwrap_or("image").to_owned();
                let content_type = field.content_type().map(ToOwned::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("failed to read upload: {e}")))?;
                let file = UploadedFile {
                    original_name,
                    content_type,
                    data,
                };

                if name == "image" {
                    form.image = Some(file);
                } else {
                    form.gallery.push(file);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("failed to read field: {e}")))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

/// A required text field of the form.
fn required_field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("missing field: {name}")))
}

/// Parse an optional text field into `T`.
fn parse_optional<T: FromStr>(fields: &HashMap<String, String>, name: &str) -> Result<Option<T>> {
    fields
        .get(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| ApiError::Validation(format!("invalid value for field: {name}")))
        })
        .transpose()
}

/// Parse a required text field into `T`.
fn parse_required<T: FromStr>(fields: &HashMap<String, String>, name: &str) -> Result<T> {
    required_field(fields, name)?
        .trim()
        .parse::<T>()
        .map_err(|_| ApiError::Validation(format!("invalid value for field: {name}")))
}

/// Parse the comma-separated category filter.
fn parse_category_filter(raw: &str) -> Result<Vec<CategoryId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map(CategoryId::new)
                .map_err(|_| ApiError::Validation(format!("invalid category id: {s}")))
        })
        .collect()
}

/// Reject negative money/stock numbers at the boundary.
fn ensure_non_negative_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() {
        return Err(ApiError::Validation("price must be non-negative".to_owned()));
    }
    Ok(price)
}

fn ensure_non_negative_stock(count: i32) -> Result<i32> {
    if count < 0 {
        return Err(ApiError::Validation(
            "countInStock must be non-negative".to_owned(),
        ));
    }
    Ok(count)
}

/// List products, optionally filtered by category membership.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query
        .categories
        .as_deref()
        .map(parse_category_filter)
        .transpose()?;

    let products = ProductRepository::new(state.pool())
        .list(filter.as_deref())
        .await?;

    Ok(Json(products))
}

/// Name/description projection of the catalog.
pub async fn names_descriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductNameDescription>>> {
    let products = ProductRepository::new(state.pool())
        .names_descriptions()
        .await?;
    Ok(Json(products))
}

/// Get a product by id.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("product".to_owned()))
}

/// Get a product by id with its category expanded.
pub async fn get_full(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductWithCategory>> {
    ProductRepository::new(state.pool())
        .get_with_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("product".to_owned()))
}

/// Create a product from a multipart form with a required `image` upload.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form = collect_form(multipart).await?;

    let category = CategoryId::new(parse_required::<i32>(&form.fields, "category")?);
    if CategoryRepository::new(state.pool())
        .get(category)
        .await?
        .is_none()
    {
        return Err(ApiError::Validation("invalid category".to_owned()));
    }

    let image = form.image.ok_or(UploadError::MissingImage)?;

    let price = ensure_non_negative_price(parse_required::<Decimal>(&form.fields, "price")?)?;
    let count_in_stock =
        ensure_non_negative_stock(parse_required::<i32>(&form.fields, "countInStock")?)?;

    // Allow-list check happens inside store_image, before the write.
    let stored = uploads::store_image(
        &state.config().uploads_dir,
        &state.config().base_url,
        &image.original_name,
        image.content_type.as_deref(),
        &image.data,
    )
    .await?;

    let input = CreateProductInput {
        name: required_field(&form.fields, "name")?.to_owned(),
        description: required_field(&form.fields, "description")?.to_owned(),
        rich_description: form
            .fields
            .get("richDescription")
            .cloned()
            .unwrap_or_default(),
        image: stored.url,
        brand: form.fields.get("brand").cloned().unwrap_or_default(),
        price,
        category,
        count_in_stock,
        rating: parse_optional::<f64>(&form.fields, "rating")?.unwrap_or(0.0),
        num_reviews: parse_optional::<i32>(&form.fields, "numReviews")?.unwrap_or(0),
        is_featured: parse_optional::<bool>(&form.fields, "isFeatured")?.unwrap_or(false),
    };

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok(Json(product))
}

/// Update a product from a multipart form; the image is only replaced
/// when a new upload is present.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form = collect_form(multipart).await?;

    let repo = ProductRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(ApiError::Validation("the product does not exist".to_owned()));
    }

    let category = parse_optional::<i32>(&form.fields, "category")?.map(CategoryId::new);
    if let Some(category) = category {
        if CategoryRepository::new(state.pool())
            .get(category)
            .await?
            .is_none()
        {
            return Err(ApiError::Validation("invalid category".to_owned()));
        }
    }

    let price = parse_optional::<Decimal>(&form.fields, "price")?
        .map(ensure_non_negative_price)
        .transpose()?;
    let count_in_stock = parse_optional::<i32>(&form.fields, "countInStock")?
        .map(ensure_non_negative_stock)
        .transpose()?;

    let image = match form.image {
        Some(image) => Some(
            uploads::store_image(
                &state.config().uploads_dir,
                &state.config().base_url,
                &image.original_name,
                image.content_type.as_deref(),
                &image.data,
            )
            .await?
            .url,
        ),
        None => None,
    };

    let input = UpdateProductInput {
        name: form.fields.get("name").cloned(),
        description: form.fields.get("description").cloned(),
        rich_description: form.fields.get("richDescription").cloned(),
        image,
        brand: form.fields.get("brand").cloned(),
        price,
        category,
        count_in_stock,
        rating: parse_optional::<f64>(&form.fields, "rating")?,
        num_reviews: parse_optional::<i32>(&form.fields, "numReviews")?,
        is_featured: parse_optional::<bool>(&form.fields, "isFeatured")?,
    };

    let product = repo.update(id, &input).await?;
    Ok(Json(product))
}

/// Replace a product's gallery with up to 10 uploads under `images`.
pub async fn update_gallery(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Json<Product>> {
    let form = collect_form(multipart).await?;

    if form.gallery.len() > MAX_GALLERY_IMAGES {
        return Err(UploadError::TooManyImages {
            max: MAX_GALLERY_IMAGES,
        }
        .into());
    }

    let repo = ProductRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(ApiError::Validation("the product does not exist".to_owned()));
    }

    let mut urls = Vec::with_capacity(form.gallery.len());
    for file in &form.gallery {
        let stored = uploads::store_image(
            &state.config().uploads_dir,
            &state.config().base_url,
            &file.original_name,
            file.content_type.as_deref(),
            &file.data,
        )
        .await?;
        urls.push(stored.url);
    }

    let product = repo.update_gallery(id, &urls).await?;
    Ok(Json(product))
}

/// Delete a product.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("product".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "the product was deleted"
    })))
}

/// Count all products.
pub async fn count(State(state): State<AppState>) -> Result<Json<Value>> {
    let count = ProductRepository::new(state.pool()).count().await?;
    Ok(Json(json!({ "productCount": count })))
}

/// The first `count` featured products.
pub async fn featured(
    State(state): State<AppState>,
    Path(count): Path<u32>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .featured(i64::from(count))
        .await?;
    Ok(Json(products))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_filter() {
        let ids = parse_category_filter("1,4, 9").expect("valid filter");
        assert_eq!(
            ids,
            vec![CategoryId::new(1), CategoryId::new(4), CategoryId::new(9)]
        );
    }

    #[test]
    fn test_parse_category_filter_rejects_garbage() {
        assert!(parse_category_filter("1,abc").is_err());
    }

    #[test]
    fn test_parse_category_filter_skips_empty_segments() {
        let ids = parse_category_filter("3,,5,").expect("valid filter");
        assert_eq!(ids, vec![CategoryId::new(3), CategoryId::new(5)]);
    }

    #[test]
    fn test_ensure_non_negative_price() {
        assert!(ensure_non_negative_price(Decimal::new(1999, 2)).is_ok());
        assert!(ensure_non_negative_price(Decimal::ZERO).is_ok());
        assert!(ensure_non_negative_price(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_ensure_non_negative_stock() {
        assert!(ensure_non_negative_stock(0).is_ok());
        assert!(ensure_non_negative_stock(-1).is_err());
    }

    #[test]
    fn test_required_field() {
        let mut fields = HashMap::new();
        fields.insert("name".to_owned(), "Mug".to_owned());
        fields.insert("blank".to_owned(), "  ".to_owned());

        assert_eq!(required_field(&fields, "name").expect("present"), "Mug");
        assert!(required_field(&fields, "blank").is_err());
        assert!(required_field(&fields, "absent").is_err());
    }

    #[test]
    fn test_parse_optional() {
        let mut fields = HashMap::new();
        fields.insert("rating".to_owned(), "4.5".to_owned());
        fields.insert("bad".to_owned(), "x".to_owned());

        assert_eq!(
            parse_optional::<f64>(&fields, "rating").expect("valid"),
            Some(4.5)
        );
        assert_eq!(
            parse_optional::<f64>(&fields, "absent").expect("absent ok"),
            None
        );
        assert!(parse_optional::<f64>(&fields, "bad").is_err());
    }
}
