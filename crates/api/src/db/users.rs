//! Account repository: users, bearer tokens, and the mirrored cart.
//!
//! Queries use the sqlx runtime API; the mirrored cart travels as a JSONB
//! document and is always overwritten wholesale.

use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use kirana_core::cart::CartLine;
use kirana_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

const USER_COLUMNS: &str = "id, name, email, is_admin, address, avatar_url, created_at";

/// Repository for account database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        user_from_row(&row)
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Get an account and its password hash by email.
    ///
    /// Returns `None` if no account uses the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = user_from_row(&row)?;
        let password_hash: String = row.try_get("password_hash")?;
        Ok(Some((user, password_hash)))
    }

    /// List every account (admin surface). Hashes are not selected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    /// Update profile fields. `None` keeps the stored value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        address: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 address = COALESCE($3, address), \
                 avatar_url = COALESCE($4, avatar_url) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(name)
        .bind(address)
        .bind(avatar_url)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        user_from_row(&row)
    }

    // =========================================================================
    // Mirrored cart
    // =========================================================================

    /// Read the account's mirrored cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn get_cart(&self, id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let row = sqlx::query("SELECT cart FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let Json(lines): Json<Vec<CartLine>> = row.try_get("cart")?;
        Ok(lines)
    }

    /// Overwrite the account's mirrored cart wholesale (last writer wins).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_cart(&self, id: UserId, lines: &[CartLine]) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET cart = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(Json(lines))
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Bearer tokens
    // =========================================================================

    /// Store a freshly minted bearer token for an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_token(&self, id: UserId, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO auth_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Resolve a bearer token to its account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT u.id, u.name, u.email, u.is_admin, u.address, u.avatar_url, u.created_at \
             FROM auth_tokens t \
             JOIN users u ON u.id = t.user_id \
             WHERE t.token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}

/// Map a user row to the domain type.
fn user_from_row(row: &PgRow) -> Result<User, RepositoryError> {
    let email: String = row.try_get("email")?;
    let email = Email::parse(&email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;

    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email,
        is_admin: row.try_get("is_admin")?,
        address: row.try_get("address")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
    })
}
