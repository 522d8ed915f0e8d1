//! HTTP route handlers for the catalog API.
//!
//! All resource routes are nested under the configured API prefix
//! (default `/api/v1`). Uploaded images are served separately under
//! `/public/uploads`.
//!
//! # Route Structure
//!
//! ```text
//! # Categories
//! GET    /categories              - List categories (public)
//! POST   /categories              - Create category (admin)
//! GET    /categories/{id}         - Category by id (public)
//! PUT    /categories/{id}         - Update category (admin)
//! DELETE /categories/{id}         - Delete category (admin)
//!
//! # Products
//! GET    /products?categories=1,2       - List, optionally by category (public)
//! GET    /products/names-descriptions   - Name/description projection (public)
//! GET    /products/get/count            - {productCount} (public)
//! GET    /products/get/featured/{count} - First N featured (public)
//! GET    /products/full/{id}            - Product with category expanded (public)
//! GET    /products/{id}                 - Product by id (public)
//! POST   /products                      - Create, multipart with `image` (admin)
//! PUT    /products/{id}                 - Update, multipart, image optional (admin)
//! PUT    /products/gallery-images/{id}  - Replace gallery, <= 10 `images` (admin)
//! DELETE /products/{id}                 - Delete product (admin)
//!
//! # Orders
//! GET    /orders                        - All orders, newest first (admin)
//! POST   /orders                        - Place an order (authenticated)
//! GET    /orders/get/totalsales         - {totalSales} (admin)
//! GET    /orders/get/count              - {orderCount} (admin)
//! GET    /orders/get/userorders/{userid} - A user's orders (self or admin)
//! GET    /orders/{id}                   - Order with items expanded (admin)
//! PUT    /orders/{id}                   - Status-only update (admin)
//! DELETE /orders/{id}                   - Delete order + items (admin)
//!
//! # Users
//! POST   /users/register          - Register (public, never grants admin)
//! POST   /users/login             - Login, returns bearer token (public)
//! GET    /users                   - List users (admin)
//! GET    /users/get/count         - {userCount} (admin)
//! GET    /users/{id}              - User by id (self or admin)
//! DELETE /users/{id}              - Delete user (admin)
//! ```

pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::remove),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/names-descriptions", get(products::names_descriptions))
        .route("/get/count", get(products::count))
        .route("/get/featured/{count}", get(products::featured))
        .route("/full/{id}", get(products::get_full))
        .route("/gallery-images/{id}", put(products::update_gallery))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/get/totalsales", get(orders::total_sales))
        .route("/get/count", get(orders::count))
        .route("/get/userorders/{userid}", get(orders::user_orders))
        .route(
            "/{id}",
            get(orders::get)
                .put(orders::update_status)
                .delete(orders::remove),
        )
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/get/count", get(users::count))
        .route("/{id}", get(users::get).delete(users::remove))
}

/// Create all resource routes, to be nested under the API prefix.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
}
