//! Order and order-item domain models.
//!
//! Order items exist only inside an order: they are written during order
//! placement and removed when their order is deleted. Clients never create
//! them standalone.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eshop_core::{OrderId, OrderItemId, ProductId, UserId};

use super::product::ProductWithCategory;

/// A placed order, as returned by list endpoints.
///
/// `order_items` carries the item IDs only; [`OrderDetail`] expands them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// IDs of the order's items, in the order the client sent them.
    pub order_items: Vec<OrderItemId>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    /// Free-text status token (e.g. "Pending", "Shipped").
    pub status: String,
    /// Sum of item price x quantity, fixed at placement time.
    pub total_price: Decimal,
    /// The user who placed the order.
    pub user: OrderUser,
    /// When the order was placed.
    pub date_ordered: DateTime<Utc>,
}

/// The slice of a user embedded in order responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// An order with items expanded down to product and category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: OrderId,
    pub order_items: Vec<OrderItemDetail>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: String,
    pub total_price: Decimal,
    pub user: OrderUser,
    pub date_ordered: DateTime<Utc>,
}

/// An order item with its product (and the product's category) expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub quantity: i32,
    pub product: ProductWithCategory,
}

/// One `{product, quantity}` pair in an order placement request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    /// Units ordered. Must be positive.
    pub quantity: i32,
    /// The product being ordered.
    pub product: ProductId,
}

/// Input for placing an order.
///
/// `total_price` is absent on purpose: it is derived server-side from the
/// referenced products' current prices.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub order_items: Vec<OrderItemInput>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    #[serde(default)]
    pub status: Option<String>,
    pub user: UserId,
}

/// Input for the status-only order update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusInput {
    pub status: String,
}
