//! OpenAPI documentation surface
//!
//! The document ships inside the binary; the UI page loads Swagger UI from
//! a CDN and points it at the embedded document.

use axum::http::header;
use axum::response::{Html, IntoResponse};

const OPENAPI_DOCUMENT: &str = include_str!("../../docs/openapi.yaml");
const UI_PAGE: &str = include_str!("../../docs/index.html");

pub async fn ui() -> Html<&'static str> {
    Html(UI_PAGE)
}

pub async fn openapi_document() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/yaml")], OPENAPI_DOCUMENT)
}
