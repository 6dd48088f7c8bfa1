//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Load the database URL from `KIRANA_DATABASE_URL` or `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, &'static str> {
    dotenvy::dotenv().ok();

    std::env::var("KIRANA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "KIRANA_DATABASE_URL not set")
}
