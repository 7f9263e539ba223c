//! Measured-item catalog handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::AppState;
use georoc_common::errors::Result;
use georoc_common::model::{Element, ElementType, ResponseEnvelope};
use georoc_common::{QueryBuilder, QueryTemplate};

use super::{apply_pagination, Params};

/// List the distinct measured chemical items
pub async fn list_elements(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<Element>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::Elements.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<Element> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}

/// List the distinct measured item types
pub async fn list_element_types(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<ElementType>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::ElementTypes.sql());
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<ElementType> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}
