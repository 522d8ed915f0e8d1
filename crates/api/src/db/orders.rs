//! Order repository for database operations.
//!
//! Order placement and order deletion are the two multi-row writes in the
//! system; both run inside a single transaction so a failure part-way
//! through leaves nothing behind.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use eshop_core::{CategoryId, OrderId, OrderItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::category::Category;
use crate::models::order::{
    CreateOrderInput, Order, OrderDetail, OrderItemDetail, OrderUser, UpdateOrderStatusInput,
};
use crate::models::product::ProductWithCategory;

/// Default status stamped on newly placed orders.
pub const DEFAULT_ORDER_STATUS: &str = "Pending";

/// Sum of price x quantity over resolved order items.
///
/// The fold is order-insensitive; the caller preserves input order
/// separately when persisting the items.
#[must_use]
pub fn order_total(items: &[(Decimal, i32)]) -> Decimal {
    items
        .iter()
        .map(|(price, quantity)| price * Decimal::from(*quantity))
        .sum()
}

/// Internal row type for order queries with the user joined in.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    shipping_address1: String,
    shipping_address2: Option<String>,
    city: String,
    zip: String,
    country: String,
    phone: String,
    status: String,
    total_price: Decimal,
    user_id: i32,
    user_name: String,
    user_email: String,
    user_is_admin: bool,
    date_ordered: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, order_items: Vec<OrderItemId>) -> Order {
        Order {
            id: OrderId::new(self.id),
            order_items,
            shipping_address1: self.shipping_address1,
            shipping_address2: self.shipping_address2,
            city: self.city,
            zip: self.zip,
            country: self.country,
            phone: self.phone,
            status: self.status,
            total_price: self.total_price,
            user: OrderUser {
                id: UserId::new(self.user_id),
                name: self.user_name,
                email: self.user_email,
                is_admin: self.user_is_admin,
            },
            date_ordered: self.date_ordered,
        }
    }

    fn into_detail(self, order_items: Vec<OrderItemDetail>) -> OrderDetail {
        OrderDetail {
            id: OrderId::new(self.id),
            order_items,
            shipping_address1: self.shipping_address1,
            shipping_address2: self.shipping_address2,
            city: self.city,
            zip: self.zip,
            country: self.country,
            phone: self.phone,
            status: self.status,
            total_price: self.total_price,
            user: OrderUser {
                id: UserId::new(self.user_id),
                name: self.user_name,
                email: self.user_email,
                is_admin: self.user_is_admin,
            },
            date_ordered: self.date_ordered,
        }
    }
}

const ORDER_SELECT: &str = r"
    SELECT o.id, o.shipping_address1, o.shipping_address2, o.city, o.zip,
           o.country, o.phone, o.status, o.total_price, o.date_ordered,
           u.id AS user_id, u.name AS user_name, u.email AS user_email,
           u.is_admin AS user_is_admin
    FROM orders o
    JOIN users u ON u.id = o.user_id
";

/// Internal row type for expanded order items.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemDetailRow {
    item_id: i32,
    quantity: i32,
    product_id: i32,
    product_name: String,
    product_description: String,
    product_rich_description: String,
    product_image: String,
    product_images: Vec<String>,
    product_brand: String,
    product_price: Decimal,
    product_count_in_stock: i32,
    product_rating: f64,
    product_num_reviews: i32,
    product_is_featured: bool,
    product_date_created: DateTime<Utc>,
    category_id: i32,
    category_name: String,
    category_icon: String,
    category_color: String,
}

impl From<OrderItemDetailRow> for OrderItemDetail {
    fn from(row: OrderItemDetailRow) -> Self {
        Self {
            id: OrderItemId::new(row.item_id),
            quantity: row.quantity,
            product: ProductWithCategory {
                id: ProductId::new(row.product_id),
                name: row.product_name,
                description: row.product_description,
                rich_description: row.product_rich_description,
                image: row.product_image,
                images: row.product_images,
                brand: row.product_brand,
                price: row.product_price,
                category: Category {
                    id: CategoryId::new(row.category_id),
                    name: row.category_name,
                    icon: row.category_icon,
                    color: row.category_color,
                },
                count_in_stock: row.product_count_in_stock,
                rating: row.product_rating,
                num_reviews: row.product_num_reviews,
                is_featured: row.product_is_featured,
                date_created: row.product_date_created,
            },
        }
    }
}

const ORDER_ITEM_DETAIL_SELECT: &str = r"
    SELECT oi.id AS item_id, oi.quantity,
           p.id AS product_id, p.name AS product_name,
           p.description AS product_description,
           p.rich_description AS product_rich_description,
           p.image AS product_image, p.images AS product_images,
           p.brand AS product_brand, p.price AS product_price,
           p.count_in_stock AS product_count_in_stock,
           p.rating AS product_rating, p.num_reviews AS product_num_reviews,
           p.is_featured AS product_is_featured,
           p.date_created AS product_date_created,
           c.id AS category_id, c.name AS category_name,
           c.icon AS category_icon, c.color AS category_color
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id
    JOIN categories c ON c.id = p.category_id
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first, with item IDs and the user embedded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("{ORDER_SELECT} ORDER BY o.date_ordered DESC"))
                .fetch_all(self.pool)
                .await?;

        let order_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items = self.item_ids_for(&order_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let ids = items.remove(&row.id).unwrap_or_default();
                row.into_order(ids)
            })
            .collect())
    }

    /// Get one order with items expanded down to product and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.item_details_for(OrderId::new(row.id)).await?;
        Ok(Some(row.into_detail(items)))
    }

    /// All orders for one user, newest first, items expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<OrderDetail>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{ORDER_SELECT} WHERE o.user_id = $1 ORDER BY o.date_ordered DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.item_details_for(OrderId::new(row.id)).await?;
            orders.push(row.into_detail(items));
        }

        Ok(orders)
    }

    /// Place an order: resolve product prices, persist one item row per
    /// input pair (input order preserved), and store the derived total.
    ///
    /// Runs in a single transaction - a missing product or any failed
    /// insert leaves no rows behind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MissingReference` if an item references a
    /// product that does not exist, or the user is unknown.
    pub async fn create(&self, input: &CreateOrderInput) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user: Option<(String, String, bool)> =
            sqlx::query_as("SELECT name, email, is_admin FROM users WHERE id = $1")
                .bind(input.user)
                .fetch_optional(&mut *tx)
                .await?;
        let (user_name, user_email, user_is_admin) = user.ok_or_else(|| {
            RepositoryError::MissingReference(format!("invalid user: {}", input.user))
        })?;

        // Resolve current prices up front; any dangling reference aborts
        // before a single row is written.
        let mut resolved = Vec::with_capacity(input.order_items.len());
        for item in &input.order_items {
            let price: Option<Decimal> =
                sqlx::query_scalar("SELECT price FROM products WHERE id = $1")
                    .bind(item.product)
                    .fetch_optional(&mut *tx)
                    .await?;
            let price = price.ok_or_else(|| {
                RepositoryError::MissingReference(format!("invalid product: {}", item.product))
            })?;
            resolved.push((price, item.quantity));
        }

        let total_price = order_total(&resolved);
        let status = input
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_owned());

        let (order_id, date_ordered): (i32, DateTime<Utc>) = sqlx::query_as(
            r"
            INSERT INTO orders
                (shipping_address1, shipping_address2, city, zip, country,
                 phone, status, total_price, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, date_ordered
            ",
        )
        .bind(&input.shipping_address1)
        .bind(input.shipping_address2.as_deref())
        .bind(&input.city)
        .bind(&input.zip)
        .bind(&input.country)
        .bind(&input.phone)
        .bind(&status)
        .bind(total_price)
        .bind(input.user)
        .fetch_one(&mut *tx)
        .await?;

        let mut item_ids = Vec::with_capacity(input.order_items.len());
        for (position, item) in input.order_items.iter().enumerate() {
            let item_id: i32 = sqlx::query_scalar(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                ",
            )
            .bind(order_id)
            .bind(item.product)
            .bind(item.quantity)
            .bind(i32::try_from(position).map_err(|_| {
                RepositoryError::Conflict("too many order items".to_owned())
            })?)
            .fetch_one(&mut *tx)
            .await?;
            item_ids.push(OrderItemId::new(item_id));
        }

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(order_id),
            order_items: item_ids,
            shipping_address1: input.shipping_address1.clone(),
            shipping_address2: input.shipping_address2.clone(),
            city: input.city.clone(),
            zip: input.zip.clone(),
            country: input.country.clone(),
            phone: input.phone.clone(),
            status,
            total_price,
            user: OrderUser {
                id: input.user,
                name: user_name,
                email: user_email,
                is_admin: user_is_admin,
            },
            date_ordered,
        })
    }

    /// Replace an order's status token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        input: &UpdateOrderStatusInput,
    ) -> Result<Order, RepositoryError> {
        let updated: Option<i32> =
            sqlx::query_scalar("UPDATE orders SET status = $2 WHERE id = $1 RETURNING id")
                .bind(id)
                .bind(&input.status)
                .fetch_optional(self.pool)
                .await?;

        if updated.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let row: OrderRow = sqlx::query_as(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_one(self.pool)
            .await?;
        let items = self.item_ids_for(&[row.id]).await?.remove(&row.id);

        Ok(row.into_order(items.unwrap_or_default()))
    }

    /// Delete an order and every item it owns, atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist;
    /// nothing is mutated in that case.
    pub async fn delete(&self, id: OrderId) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let items = sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let orders = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if orders.rows_affected() == 0 {
            // Dropping the transaction rolls back the item deletes.
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(usize::try_from(items.rows_affected()).unwrap_or(usize::MAX))
    }

    /// Sum of `total_price` across all orders; 0 when there are none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_sales(&self) -> Result<Decimal, RepositoryError> {
        let total: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(total_price), 0) FROM orders")
                .fetch_one(self.pool)
                .await?;

        Ok(total)
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Item IDs for a set of orders, grouped by order, in stored position.
    async fn item_ids_for(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderItemId>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i32)> = sqlx::query_as(
            r"
            SELECT order_id, id FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<OrderItemId>> = HashMap::new();
        for (order_id, item_id) in rows {
            grouped
                .entry(order_id)
                .or_default()
                .push(OrderItemId::new(item_id));
        }

        Ok(grouped)
    }

    /// Expanded items for one order, in stored position.
    async fn item_details_for(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItemDetail>, RepositoryError> {
        let rows: Vec<OrderItemDetailRow> = sqlx::query_as(&format!(
            "{ORDER_ITEM_DETAIL_SELECT} WHERE oi.order_id = $1 ORDER BY oi.position"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItemDetail::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total_worked_example() {
        // P1 price 10 x 2, P2 price 5 x 1 => 25
        let items = vec![
            (Decimal::new(10, 0), 2),
            (Decimal::new(5, 0), 1),
        ];
        assert_eq!(order_total(&items), Decimal::new(25, 0));
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_order_total_is_order_insensitive() {
        let forward = vec![
            (Decimal::new(1999, 2), 3),
            (Decimal::new(499, 2), 7),
            (Decimal::new(25, 0), 1),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(order_total(&forward), order_total(&reversed));
    }

    #[test]
    fn test_order_total_fractional_prices() {
        // 19.99 * 2 + 0.01 * 3 = 40.01
        let items = vec![
            (Decimal::new(1999, 2), 2),
            (Decimal::new(1, 2), 3),
        ];
        assert_eq!(order_total(&items), Decimal::new(4001, 2));
    }
}
