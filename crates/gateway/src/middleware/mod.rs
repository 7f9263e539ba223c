//! Gateway middleware

pub mod auth;

pub use auth::access_key_auth;
