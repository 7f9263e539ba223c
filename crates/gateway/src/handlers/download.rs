//! Tabular export download handler

use axum::{
    extract::{Extension, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;

use crate::middleware::auth::CallerId;
use crate::AppState;
use georoc_common::errors::{AppError, Result};
use georoc_common::export::{format_fulldata, ExportFormat};
use georoc_common::model::FullData;
use georoc_common::{QueryTemplate, SqlValue};

use super::Params;

/// Export the requested samples in the legacy column layout
///
/// `sampleids` is a required comma-separated list of sampling feature
/// ids; the path segment picks the output format.
pub async fn download(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(params): Query<Params>,
    caller: Option<Extension<CallerId>>,
) -> Result<Response> {
    let format: ExportFormat = format.parse()?;
    let ids = parse_sample_ids(&params)?;

    let mut records: Vec<FullData> = state
        .db
        .query_rows(
            QueryTemplate::FullDataByIds.sql(),
            &[SqlValue::IntArray(ids)],
        )
        .await?;
    for record in &mut records {
        record.finalize();
    }

    let body = format_fulldata(&records, format)?;
    info!(
        samples = records.len(),
        format = format.extension(),
        caller = caller.as_ref().map(|Extension(c)| c.0.as_str()).unwrap_or("-"),
        "Export generated"
    );
    let filename = format!(
        "GEOROC_{}.{}",
        Utc::now().format("%Y-%m-%d_%H%M%S"),
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

fn parse_sample_ids(params: &Params) -> Result<Vec<i64>> {
    let raw = params
        .get("sampleids")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::MissingParameter {
            name: "sampleids".to_string(),
        })?;

    raw.split(',')
        .map(|item| {
            item.trim()
                .parse::<i64>()
                .map_err(|_| AppError::UnparseableParameter {
                    name: "sampleids".to_string(),
                    value: item.trim().to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Option<&str>) -> Params {
        let mut p = Params::new();
        if let Some(v) = value {
            p.insert("sampleids".to_string(), v.to_string());
        }
        p
    }

    #[test]
    fn test_parse_sample_ids() {
        let ids = parse_sample_ids(&params(Some("1, 2,3"))).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_sampleids_is_400_class() {
        let err = parse_sample_ids(&params(None)).unwrap_err();
        assert!(matches!(err, AppError::MissingParameter { .. }));

        let err = parse_sample_ids(&params(Some("  "))).unwrap_err();
        assert!(matches!(err, AppError::MissingParameter { .. }));
    }

    #[test]
    fn test_garbage_sampleids_is_422_class() {
        let err = parse_sample_ids(&params(Some("1,two,3"))).unwrap_err();
        assert!(matches!(err, AppError::UnparseableParameter { .. }));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert!("csv".parse::<ExportFormat>().is_ok());
        assert!("xlsx".parse::<ExportFormat>().is_ok());
    }
}
