//! Core types for Kirana.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
