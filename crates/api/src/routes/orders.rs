//! Order route handlers: the cart-to-order pipeline and the two status
//! transitions.
//!
//! Order creation freezes the submitted line items verbatim - prices are
//! taken from the snapshot, not re-read from the catalog, so a mid-checkout
//! price change neither raises nor lowers what the buyer saw. Availability
//! is checked (stock > 0) but stock is never decremented or reserved;
//! concurrent checkouts against the same low-stock product can both succeed.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::instrument;

use kirana_core::pricing::{self, OrderTotals};
use kirana_core::{OrderId, UserId};

use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::order::NewOrder;
use crate::models::{CurrentUser, Order, OrderLine, PaymentResult, ShippingAddress};
use crate::state::AppState;

/// Create the order routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/myorders", get(my_orders))
        .route("/{id}", get(show))
        .route("/{id}/pay", put(pay))
        .route("/{id}/deliver", put(deliver))
}

/// Checkout submission: the cart snapshot plus shipping and payment choice.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    /// Optional coupon code; an unknown code contributes zero discount.
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Create an order from the submitted cart snapshot.
#[instrument(skip(state, user, req), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    if req.order_items.is_empty() {
        return Err(AppError::Validation(
            "Cannot place an order with an empty cart".to_string(),
        ));
    }

    // Availability check only. Stock is not reserved or decremented.
    let products = ProductRepository::new(state.pool());
    for line in &req.order_items {
        let product = products
            .get(line.product_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Product {} is no longer available",
                    line.product_id
                ))
            })?;

        if !product.is_purchasable() {
            return Err(AppError::Validation(format!(
                "{} is out of stock",
                product.name
            )));
        }
    }

    // Prices come from the snapshot the buyer saw, stale or not.
    let items_price = pricing::items_price(
        req.order_items
            .iter()
            .map(|line| (line.unit_price, line.quantity)),
    );
    let totals = OrderTotals::compute(items_price, req.coupon_code.as_deref());

    let order = OrderRepository::new(state.pool())
        .create(&NewOrder {
            user_id: user.id,
            line_items: req.order_items,
            shipping_address: req.shipping_address,
            payment_method: req.payment_method,
            items_price: totals.items_price,
            tax_price: totals.tax_price,
            shipping_price: totals.shipping_price,
            total_price: totals.total_price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List every order (admin).
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// List the caller's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn my_orders(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(orders))
}

/// Fetch one order (owner or admin).
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = fetch_order(&state, OrderId::new(id)).await?;
    authorize_owner(&user, order.user_id)?;
    Ok(Json(order))
}

/// Mark an order paid (owner or admin).
///
/// Trusted-caller transition: the gateway echo is stored, never verified.
#[instrument(skip(state, user, payment))]
pub async fn pay(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i32>,
    Json(payment): Json<PaymentResult>,
) -> Result<Json<Order>> {
    let id = OrderId::new(id);
    let order = fetch_order(&state, id).await?;
    authorize_owner(&user, order.user_id)?;

    let order = OrderRepository::new(state.pool())
        .mark_paid(id, &payment)
        .await?;
    Ok(Json(order))
}

/// Mark an order delivered (admin).
#[instrument(skip(state, _admin))]
pub async fn deliver(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .mark_delivered(OrderId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order".to_string()),
            other => AppError::Database(other),
        })?;
    Ok(Json(order))
}

/// Fetch an order or 404.
async fn fetch_order(state: &AppState, id: OrderId) -> Result<Order> {
    OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))
}

/// Owners and admins only.
fn authorize_owner(user: &CurrentUser, owner: UserId) -> Result<()> {
    if user.id == owner || user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to access this order".to_string(),
        ))
    }
}
