//! Author query handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::model::{Person, ResponseEnvelope};
use georoc_common::{QueryBuilder, QueryTemplate, SqlValue};

use super::{apply_pagination, Params};

/// List authors with pagination
pub async fn list_authors(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<Person>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::Authors.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<Person> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}

/// Get a single author by person id
pub async fn get_author(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
) -> Result<Json<ResponseEnvelope<Vec<Person>>>> {
    let rows: Vec<Person> = state
        .db
        .query_rows(QueryTemplate::AuthorById.sql(), &[SqlValue::Int(person_id)])
        .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound {
            resource_type: "author".to_string(),
            id: person_id.to_string(),
        });
    }
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}
