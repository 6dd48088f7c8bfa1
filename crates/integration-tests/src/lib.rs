//! End-to-end tests for the Kirana API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, migrate, and create the test admin
//! cargo run -p kirana-cli -- migrate
//! cargo run -p kirana-cli -- admin create \
//!     -e admin@kirana.test -n "Test Admin" -p "test admin password"
//!
//! # Start the API
//! cargo run -p kirana-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p kirana-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `KIRANA_API_BASE_URL` - API under test (default: `http://localhost:5000`)
//! - `KIRANA_TEST_ADMIN_EMAIL` / `KIRANA_TEST_ADMIN_PASSWORD` - admin
//!   credentials for the admin-only flows (defaults match the snippet above)

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API under test (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("KIRANA_API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Build the shared HTTP client.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email for one test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@kirana.test", uuid::Uuid::new_v4().simple())
}

/// Register a fresh account; returns its summary (including `token`).
///
/// # Panics
///
/// Panics if the request fails or the API rejects the registration.
pub async fn register_user(client: &Client, name: &str) -> Value {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/users/register"))
        .json(&json!({
            "name": name,
            "email": unique_email("shopper"),
            "password": "a perfectly fine password",
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), 201, "registration should succeed");
    resp.json().await.expect("Failed to parse registration body")
}

/// Extract the bearer token from a register/login response body.
///
/// # Panics
///
/// Panics if the body has no `token` string.
#[must_use]
pub fn token_of(body: &Value) -> String {
    body["token"]
        .as_str()
        .expect("response should carry a token")
        .to_string()
}

/// Login as the test admin (see crate docs for how it is provisioned).
///
/// # Panics
///
/// Panics if the admin login fails.
pub async fn admin_token(client: &Client) -> String {
    let base_url = api_base_url();
    let email = std::env::var("KIRANA_TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@kirana.test".to_string());
    let password = std::env::var("KIRANA_TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "test admin password".to_string());

    let resp = client
        .post(format!("{base_url}/api/users/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login as admin");

    assert_eq!(
        resp.status(),
        200,
        "admin login should succeed; is the test admin provisioned?"
    );
    let body: Value = resp.json().await.expect("Failed to parse admin login body");
    assert_eq!(body["is_admin"], json!(true), "test account must be admin");
    token_of(&body)
}

/// Create a product via the admin surface; returns the product body.
///
/// # Panics
///
/// Panics if the request fails or is rejected.
pub async fn create_product(
    client: &Client,
    admin_token: &str,
    name: &str,
    price_rupees: i64,
    stock_count: i32,
) -> Value {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/api/products"))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": name,
            "price": price_rupees.to_string(),
            "category": "Test",
            "stock_count": stock_count,
        }))
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    resp.json().await.expect("Failed to parse product body")
}
