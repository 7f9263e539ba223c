//! GeoJSON site handler for the map view

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{Map, Value};

use crate::AppState;
use georoc_common::errors::Result;
use georoc_common::model::GeoJsonFeatureCollection;
use georoc_common::{QueryBuilder, QueryTemplate};

use super::{apply_pagination, Params};

/// Sites grouped by coordinate pair, as a GeoJSON feature collection
pub async fn list_sites(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<GeoJsonFeatureCollection>> {
    let mut builder = QueryBuilder::new(QueryTemplate::GeoJsonSites.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<Map<String, Value>> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(GeoJsonFeatureCollection::from_rows(rows)))
}
