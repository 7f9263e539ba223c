//! Catalog statistics handler

use axum::{extract::State, Json};

use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::model::Statistics;
use georoc_common::QueryTemplate;

/// Catalog-wide aggregate counts
pub async fn get_statistics(State(state): State<AppState>) -> Result<Json<Statistics>> {
    let rows: Vec<Statistics> = state
        .db
        .query_rows(QueryTemplate::Statistics.sql(), &[])
        .await?;

    rows.into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| AppError::Internal {
            message: "statistics query returned no rows".to_string(),
        })
}
