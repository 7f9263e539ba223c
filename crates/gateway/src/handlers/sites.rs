//! Site query handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::model::{ResponseEnvelope, Site, SiteSetting};
use georoc_common::{QueryBuilder, QueryTemplate, SqlValue};

use super::{apply_pagination, Params};

/// List sampling sites
pub async fn list_sites(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<Site>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::Sites.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<Site> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}

/// Get a single site by sampling feature id
pub async fn get_site(
    State(state): State<AppState>,
    Path(sampling_feature_id): Path<i64>,
) -> Result<Json<ResponseEnvelope<Vec<Site>>>> {
    let rows: Vec<Site> = state
        .db
        .query_rows(
            QueryTemplate::SiteById.sql(),
            &[SqlValue::Int(sampling_feature_id)],
        )
        .await?;

    if rows.is_empty() {
        return Err(AppError::NotFound {
            resource_type: "site".to_string(),
            id: sampling_feature_id.to_string(),
        });
    }
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}

/// List the distinct geological settings
pub async fn list_settings(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<SiteSetting>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::SiteSettings.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<SiteSetting> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}
