//! FullData projection handler

use axum::{
    extract::{Path, State},
    Json,
};

use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::model::{FullData, ResponseEnvelope};
use georoc_common::{QueryTemplate, SqlValue};

/// Get the full denormalized record for one sampling feature
pub async fn get_fulldata(
    State(state): State<AppState>,
    Path(identifier): Path<i64>,
) -> Result<Json<ResponseEnvelope<FullData>>> {
    let mut rows: Vec<FullData> = state
        .db
        .query_rows(
            QueryTemplate::FullDataByIds.sql(),
            &[SqlValue::IntArray(vec![identifier])],
        )
        .await?;

    let Some(mut record) = rows.pop() else {
        return Err(AppError::NotFound {
            resource_type: "sample".to_string(),
            id: identifier.to_string(),
        });
    };
    record.finalize();

    Ok(Json(ResponseEnvelope {
        num_items: 1,
        data: record,
    }))
}
