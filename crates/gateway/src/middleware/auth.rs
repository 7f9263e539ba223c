//! Access-key authentication
//!
//! Every protected route requires the shared access key in the configured
//! header. Keys come from the secret file through the TTL-bounded store,
//! so a rotation propagates without a restart. The caller identity hidden
//! in the key prefix lands in the request extensions for the access log.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::secrets;

/// Caller identity derived from the access key, if decodable
#[derive(Debug, Clone)]
pub struct CallerId(pub String);

/// Reject requests without a valid access key
pub async fn access_key_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let header_name = state.config.auth.access_key_header.as_str();

    let key = request
        .headers()
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized {
            message: format!("missing {} header", header_name),
        })?;

    if !state.keys.is_valid(&key)? {
        return Err(AppError::InvalidAccessKey);
    }

    if let Some(caller) = secrets::tracking_id(&key) {
        debug!(caller = %caller, "Authenticated request");
        request.extensions_mut().insert(CallerId(caller));
    }

    Ok(next.run(request).await)
}
