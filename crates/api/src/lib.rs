//! Kirana API library.
//!
//! The storefront API as a library, so the CLI (migrations, admin
//! bootstrap, seeding) can reuse the repositories and auth service, and so
//! the pieces can be unit tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
