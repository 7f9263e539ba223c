//! GEOROC API Common Library
//!
//! Shared code for the GEOROC read API:
//! - Configuration management
//! - Error types and HTTP mapping
//! - Secret file loading and access-key store
//! - Database pool, JSON query envelope, query builder and SQL templates
//! - Domain models (catalog entities, FullData projection, GeoJSON)
//! - Tabular export (CSV / XLSX) in the legacy GEOROC column layout
//! - Bounding-box geometry helpers

pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod geometry;
pub mod model;
pub mod secrets;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, QueryBuilder, QueryTemplate, SqlValue};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Secret file key holding the database user
pub const SECRET_DB_USER: &str = "DB_USER";

/// Secret file key holding the database password
pub const SECRET_DB_PASSWORD: &str = "DB_PASSWORD";
