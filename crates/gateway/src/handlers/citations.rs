//! Citation query handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::model::{Citation, ResponseEnvelope};
use georoc_common::{QueryBuilder, QueryTemplate, SqlValue};

use super::{apply_pagination, Params};

/// List citations with their aggregated authors
pub async fn list_citations(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<Citation>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::Citations.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<Citation> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}

/// Get a single citation by id
pub async fn get_citation(
    State(state): State<AppState>,
    Path(citation_id): Path<i64>,
) -> Result<Json<ResponseEnvelope<Vec<Citation>>>> {
    let rows: Vec<Citation> = state
        .db
        .query_rows(
            QueryTemplate::CitationById.sql(),
            &[SqlValue::Int(citation_id)],
        )
        .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound {
            resource_type: "citation".to_string(),
            id: citation_id.to_string(),
        });
    }
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}
