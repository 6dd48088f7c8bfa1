//! Account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kirana_core::{Email, UserId};

/// A storefront account (domain type, hash omitted).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across accounts.
    pub email: Email,
    /// Whether this account may use the admin surface.
    pub is_admin: bool,
    /// Free-form shipping address from the profile page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Profile image URL (upload happens elsewhere; we only keep the URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The authenticated actor attached to a request.
///
/// Resolved from the bearer token by the auth extractors; handlers only see
/// this identity + admin-flag pair, never the token itself.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}
