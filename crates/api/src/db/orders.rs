//! Order repository.
//!
//! An order is inserted exactly once, as a single atomic statement; the two
//! status transitions are single-row updates. Nothing here ever rewrites
//! `line_items`.

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use kirana_core::{Money, OrderId, UserId};

use super::RepositoryError;
use crate::models::order::NewOrder;
use crate::models::{Order, OrderLine, PaymentResult, ShippingAddress};

const ORDER_COLUMNS: &str = "id, user_id, line_items, shipping_address, payment_method, \
                             items_price, tax_price, shipping_price, total_price, \
                             is_paid, paid_at, payment_result, is_delivered, delivered_at, \
                             created_at";

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

    /// Insert an order. Both status flags start false.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails; no partial
    /// order is left behind.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO orders \
             (user_id, line_items, shipping_address, payment_method, \
              items_price, tax_price, shipping_price, total_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new.user_id.as_i32())
        .bind(Json(&new.line_items))
        .bind(Json(&new.shipping_address))
        .bind(&new.payment_method)
        .bind(new.items_price.amount())
        .bind(new.tax_price.amount())
        .bind(new.shipping_price.amount())
        .bind(new.total_price.amount())
        .fetch_one(self.pool)
        .await?;

        order_from_row(&row)
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    /// List one account's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    /// List every order (admin surface), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    /// Transition `is_paid` to true, stamping `paid_at` and storing the
    /// gateway echo. Calling again re-stamps.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        payment: &PaymentResult,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE orders \
             SET is_paid = TRUE, paid_at = now(), payment_result = $2 \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(Json(payment))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        order_from_row(&row)
    }

    /// Transition `is_delivered` to true, stamping `delivered_at`. Calling
    /// again re-stamps.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_delivered(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE orders \
             SET is_delivered = TRUE, delivered_at = now() \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        order_from_row(&row)
    }
}

/// Map an order row to the domain type.
fn order_from_row(row: &PgRow) -> Result<Order, RepositoryError> {
    let Json(line_items): Json<Vec<OrderLine>> = row.try_get("line_items")?;
    let Json(shipping_address): Json<ShippingAddress> = row.try_get("shipping_address")?;
    let payment_result: Option<Json<PaymentResult>> = row.try_get("payment_result")?;

    Ok(Order {
        id: OrderId::new(row.try_get("id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        line_items,
        shipping_address,
        payment_method: row.try_get("payment_method")?,
        items_price: Money::new(row.try_get("items_price")?),
        tax_price: Money::new(row.try_get("tax_price")?),
        shipping_price: Money::new(row.try_get("shipping_price")?),
        total_price: Money::new(row.try_get("total_price")?),
        is_paid: row.try_get("is_paid")?,
        paid_at: row.try_get("paid_at")?,
        payment_result: payment_result.map(|Json(p)| p),
        is_delivered: row.try_get("is_delivered")?,
        delivered_at: row.try_get("delivered_at")?,
        created_at: row.try_get("created_at")?,
    })
}
