//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use eshop_core::{OrderId, UserId};

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::auth::{RequireAdmin, RequireAuth};
use crate::models::order::{CreateOrderInput, Order, OrderDetail, UpdateOrderStatusInput};
use crate::state::AppState;

/// List all orders, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// Get one order with its items expanded.
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("order".to_owned()))
}

/// Place an order.
///
/// The total price is derived server-side from the referenced products'
/// current prices; the item inserts and the order insert are one
/// transaction.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateOrderInput>,
) -> Result<Json<Order>> {
    if !user.is_admin && input.user != user.id {
        return Err(ApiError::Forbidden(
            "cannot place an order for another user".to_owned(),
        ));
    }

    if input.order_items.is_empty() {
        return Err(ApiError::Validation(
            "order must contain at least one item".to_owned(),
        ));
    }

    for item in &input.order_items {
        if item.quantity <= 0 {
            return Err(ApiError::Validation(
                "quantity must be positive".to_owned(),
            ));
        }
    }

    let order = OrderRepository::new(state.pool()).create(&input).await?;
    Ok(Json(order))
}

/// Replace an order's status token.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(input): Json<UpdateOrderStatusInput>,
) -> Result<Json<Order>> {
    if input.status.trim().is_empty() {
        return Err(ApiError::Validation("status must not be empty".to_owned()));
    }

    let order = OrderRepository::new(state.pool())
        .update_status(id, &input)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("order".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(order))
}

/// Delete an order and every item it owns.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("order".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "the order was deleted"
    })))
}

/// Sum of `totalPrice` across all orders.
pub async fn total_sales(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let total = OrderRepository::new(state.pool()).total_sales().await?;
    Ok(Json(json!({ "totalSales": total })))
}

/// Count all orders.
pub async fn count(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let count = OrderRepository::new(state.pool()).count().await?;
    Ok(Json(json!({ "orderCount": count })))
}

/// One user's orders, newest first, items expanded.
///
/// Non-admins may only read their own order history.
pub async fn user_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<OrderDetail>>> {
    if !user.is_admin && user_id != user.id {
        return Err(ApiError::Forbidden(
            "cannot read another user's orders".to_owned(),
        ));
    }

    let orders = OrderRepository::new(state.pool()).by_user(user_id).await?;
    Ok(Json(orders))
}
