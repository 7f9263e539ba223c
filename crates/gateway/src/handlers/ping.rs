//! Liveness probe

/// Unauthenticated liveness check
pub async fn ping() -> &'static str {
    "Pong"
}
