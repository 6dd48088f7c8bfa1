//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (probes the database)
//!
//! # Catalog (public)
//! GET    /api/products          - List products (?q= substring, ?category= exact)
//! GET    /api/products/{id}     - Product detail
//!
//! # Catalog (admin)
//! POST   /api/products          - Create product
//! PUT    /api/products/{id}     - Update product
//! DELETE /api/products/{id}     - Delete product
//!
//! # Orders
//! POST /api/orders              - Create order from submitted line items (user)
//! GET  /api/orders              - List all orders (admin)
//! GET  /api/orders/myorders     - List own orders (user)
//! GET  /api/orders/{id}         - Fetch one order (owner or admin)
//! PUT  /api/orders/{id}/pay     - Mark paid (owner or admin)
//! PUT  /api/orders/{id}/deliver - Mark delivered (admin)
//!
//! # Accounts
//! POST /api/users/register      - Register (rate limited)
//! POST /api/users/login         - Login (rate limited)
//! GET  /api/users               - List accounts (admin)
//! GET  /api/users/profile       - Own profile (user)
//! PUT  /api/users/profile       - Update own profile (user)
//! GET  /api/users/cart          - Pull the mirrored cart (user)
//! POST /api/users/cart          - Overwrite the mirrored cart (user)
//! ```

pub mod orders;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", products::routes())
        .nest("/api/orders", orders::routes())
        .nest("/api/users", users::routes())
}
