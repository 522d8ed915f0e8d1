//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use eshop_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::category::Category;
use crate::models::product::{
    CreateProductInput, Product, ProductNameDescription, ProductWithCategory, UpdateProductInput,
};

const PRODUCT_COLUMNS: &str = "id, name, description, rich_description, image, images, brand, \
     price, category_id, count_in_stock, rating, num_reviews, is_featured, date_created";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    rich_description: String,
    image: String,
    images: Vec<String>,
    brand: String,
    price: Decimal,
    category_id: i32,
    count_in_stock: i32,
    rating: f64,
    num_reviews: i32,
    is_featured: bool,
    date_created: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            rich_description: row.rich_description,
            image: row.image,
            images: row.images,
            brand: row.brand,
            price: row.price,
            category: CategoryId::new(row.category_id),
            count_in_stock: row.count_in_stock,
            rating: row.rating,
            num_reviews: row.num_reviews,
            is_featured: row.is_featured,
            date_created: row.date_created,
        }
    }
}

/// Internal row type for product queries with the category joined in.
#[derive(Debug, sqlx::FromRow)]
struct ProductWithCategoryRow {
    id: i32,
    name: String,
    description: String,
    rich_description: String,
    image: String,
    images: Vec<String>,
    brand: String,
    price: Decimal,
    count_in_stock: i32,
    rating: f64,
    num_reviews: i32,
    is_featured: bool,
    date_created: DateTime<Utc>,
    category_id: i32,
    category_name: String,
    category_icon: String,
    category_color: String,
}

impl From<ProductWithCategoryRow> for ProductWithCategory {
    fn from(row: ProductWithCategoryRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            rich_description: row.rich_description,
            image: row.image,
            images: row.images,
            brand: row.brand,
            price: row.price,
            category: Category {
                id: CategoryId::new(row.category_id),
                name: row.category_name,
                icon: row.category_icon,
                color: row.category_color,
            },
            count_in_stock: row.count_in_stock,
            rating: row.rating,
            num_reviews: row.num_reviews,
            is_featured: row.is_featured,
            date_created: row.date_created,
        }
    }
}

/// Internal row type for the name/description projection.
#[derive(Debug, sqlx::FromRow)]
struct NameDescriptionRow {
    name: String,
    description: String,
}

/// Map a foreign-key violation on `category_id` to a typed error.
fn map_category_fk(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::MissingReference("invalid category".to_owned());
    }
    RepositoryError::Database(e)
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally restricted to a set of categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        categories: Option<&[CategoryId]>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = match categories {
            Some(ids) => {
                let ids: Vec<i32> = ids.iter().map(CategoryId::as_i32).collect();
                sqlx::query_as(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ANY($1) ORDER BY id"
                ))
                .bind(ids)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Name/description projection of the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn names_descriptions(
        &self,
    ) -> Result<Vec<ProductNameDescription>, RepositoryError> {
        let rows: Vec<NameDescriptionRow> =
            sqlx::query_as("SELECT name, description FROM products ORDER BY id")
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductNameDescription {
                name: r.name,
                description: r.description,
            })
            .collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Get a product by ID with its category expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_category(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithCategory>, RepositoryError> {
        let row: Option<ProductWithCategoryRow> = sqlx::query_as(
            r"
            SELECT p.id, p.name, p.description, p.rich_description, p.image, p.images,
                   p.brand, p.price, p.count_in_stock, p.rating, p.num_reviews,
                   p.is_featured, p.date_created,
                   c.id AS category_id, c.name AS category_name,
                   c.icon AS category_icon, c.color AS category_color
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductWithCategory::from))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if the category does not
    /// exist, `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO products
                (name, description, rich_description, image, brand, price,
                 category_id, count_in_stock, rating, num_reviews, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.rich_description)
        .bind(&input.image)
        .bind(&input.brand)
        .bind(input.price)
        .bind(input.category)
        .bind(input.count_in_stock)
        .bind(input.rating)
        .bind(input.num_reviews)
        .bind(input.is_featured)
        .fetch_one(self.pool)
        .await
        .map_err(map_category_fk)?;

        Ok(row.into())
    }

    /// Update a product, keeping stored values for absent fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `RepositoryError::MissingReference` if a new category is invalid.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE products
            SET name             = COALESCE($2, name),
                description      = COALESCE($3, description),
                rich_description = COALESCE($4, rich_description),
                image            = COALESCE($5, image),
                brand            = COALESCE($6, brand),
                price            = COALESCE($7, price),
                category_id      = COALESCE($8, category_id),
                count_in_stock   = COALESCE($9, count_in_stock),
                rating           = COALESCE($10, rating),
                num_reviews      = COALESCE($11, num_reviews),
                is_featured      = COALESCE($12, is_featured)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.description.as_deref())
        .bind(input.rich_description.as_deref())
        .bind(input.image.as_deref())
        .bind(input.brand.as_deref())
        .bind(input.price)
        .bind(input.category)
        .bind(input.count_in_stock)
        .bind(input.rating)
        .bind(input.num_reviews)
        .bind(input.is_featured)
        .fetch_optional(self.pool)
        .await
        .map_err(map_category_fk)?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Replace a product's gallery image URLs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update_gallery(
        &self,
        id: ProductId,
        images: &[String],
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET images = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(images)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// or `RepositoryError::Conflict` if order items still reference it.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "product is still referenced by orders".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// The first `limit` featured products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_featured ORDER BY id LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}
