//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`:
//! PostgreSQL repositories via SeaORM and JWT/Argon2 authentication services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use database::DatabaseConnections;
