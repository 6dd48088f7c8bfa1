//! Admin account bootstrap.
//!
//! The API has no route that grants the admin flag; the first (and any
//! later) admin account is created here, directly against the database.

use tracing::info;

use kirana_api::db;
use kirana_api::services::auth::hash_password;
use kirana_core::Email;

/// Create an admin account.
///
/// # Errors
///
/// Returns an error if the email is invalid, the password is too short,
/// the email is already taken, or the database is unreachable.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    if password.len() < 8 {
        return Err("password must be at least 8 characters".into());
    }

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let password_hash = hash_password(password)?;

    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, is_admin) VALUES ($1, $2, $3, TRUE)",
    )
    .bind(name)
    .bind(email.as_str())
    .bind(&password_hash)
    .execute(&pool)
    .await;

    match result {
        Ok(_) => {
            info!(email = %email, "Admin account created");
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(format!("an account with email {email} already exists").into())
        }
        Err(e) => Err(e.into()),
    }
}
