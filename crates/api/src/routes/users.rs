//! Account route handlers: register/login, profile, and the mirrored cart.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use kirana_core::cart::CartLine;
use kirana_core::{Email, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireUser, auth_rate_limiter};
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Create the account routes router.
pub fn routes() -> Router<AppState> {
    let auth = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/", get(index))
        .route("/profile", get(profile).put(update_profile))
        .route("/cart", get(pull_cart).post(push_cart))
        .merge(auth)
}

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account summary plus a fresh bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            token,
        }
    }
}

/// Register a new account.
#[instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let (user, token) = AuthService::new(state.pool())
        .register(req.name.trim(), &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// Login to an existing account.
#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (user, token) = AuthService::new(state.pool())
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(AuthResponse::new(user, token)))
}

/// List every account (admin). Hashes never leave the repository.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// The caller's own profile.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    Ok(Json(user))
}

/// Profile update payload. Omitted fields keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Avatar URL; the image itself is uploaded elsewhere.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Update the caller's profile.
#[instrument(skip(state, user, req), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .update_profile(
            user.id,
            req.name.as_deref(),
            req.address.as_deref(),
            req.avatar_url.as_deref(),
        )
        .await?;

    Ok(Json(user))
}

/// Mirrored-cart push payload.
#[derive(Debug, Deserialize)]
pub struct SyncCartRequest {
    pub cart: Vec<CartLine>,
}

/// Pull the account's mirrored cart (login-time sync; server side wins).
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn pull_cart(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<CartLine>>> {
    let lines = UserRepository::new(state.pool()).get_cart(user.id).await?;
    Ok(Json(lines))
}

/// Overwrite the account's mirrored cart wholesale (logout-time push;
/// client side wins). No merging is attempted.
#[instrument(skip(state, user, req), fields(user_id = %user.id))]
pub async fn push_cart(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<SyncCartRequest>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .set_cart(user.id, &req.cart)
        .await?;

    Ok(Json(json!({ "success": true })))
}
