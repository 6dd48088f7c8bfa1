//! Domain models and wire DTOs.
//!
//! Stored models are separate from request/response shapes; the password
//! hash never leaves the `db` and `services::auth` layers.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderLine, PaymentResult, ShippingAddress};
pub use product::{Product, ProductInput};
pub use user::{CurrentUser, User};
