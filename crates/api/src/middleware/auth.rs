//! Authentication extractors.
//!
//! Resolves the `Authorization: Bearer …` header to a [`CurrentUser`]
//! through the token repository. Handlers declare what they need in their
//! signature and never see the raw token.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn my_orders(
//!     State(state): State<AppState>,
//!     RequireUser(user): RequireUser,
//! ) -> Result<Json<Vec<Order>>> {
//!     // user.id, user.is_admin are trustworthy here
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::db::users::UserRepository;
use crate::error::message_response;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that requires an authenticated caller.
pub struct RequireUser(pub CurrentUser);

/// Extractor that requires an authenticated administrator.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for the auth extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// No bearer token on the request.
    MissingToken,
    /// Token present but not recognized.
    InvalidToken,
    /// Caller is authenticated but not an administrator.
    AdminOnly,
    /// Token lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingToken => {
                message_response(StatusCode::UNAUTHORIZED, "Not authorized, no token")
            }
            Self::InvalidToken => {
                message_response(StatusCode::UNAUTHORIZED, "Not authorized, token failed")
            }
            Self::AdminOnly => {
                message_response(StatusCode::FORBIDDEN, "Not authorized as an admin")
            }
            Self::Internal => {
                message_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_bearer(parts, state).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_bearer(parts, state).await?;
        if !user.is_admin {
            return Err(AuthRejection::AdminOnly);
        }
        Ok(Self(user))
    }
}

/// Pull the bearer token off the request and resolve it to an account.
async fn resolve_bearer(
    parts: &Parts,
    state: &AppState,
) -> Result<CurrentUser, AuthRejection> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthRejection::MissingToken)?;

    let user = UserRepository::new(state.pool())
        .get_by_token(token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "token lookup failed");
            AuthRejection::Internal
        })?
        .ok_or(AuthRejection::InvalidToken)?;

    Ok(user.into())
}
