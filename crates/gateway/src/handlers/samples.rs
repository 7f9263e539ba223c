//! Sample query handlers
//!
//! The sample list accepts a fixed set of filter parameters, each a
//! comma-separated list of values that becomes an `IN (...)` predicate on
//! the mapped template column. Unknown parameters are ignored; known
//! parameters with unsafe values are rejected.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::AppState;
use georoc_common::errors::Result;
use georoc_common::model::{ResponseEnvelope, Sample};
use georoc_common::{QueryBuilder, QueryTemplate};

use super::{apply_pagination, Params};

/// Filter parameter name -> template column reference
const FILTER_COLUMNS: &[(&str, &str)] = &[
    ("setting", "st.setting"),
    ("location1", "toplevelloc.locationname"),
    ("location2", "secondlevelloc.locationname"),
    ("location3", "thirdlevelloc.locationname"),
    ("samplename", "sf.samplingfeaturename"),
    ("sampletech", "ann_tech.annotationtext"),
    ("landorsea", "ann_land.annotationtext"),
    ("rocktype", "tax_type.taxonomicclassifiername"),
    ("rockclass", "tax_class.taxonomicclassifiername"),
    ("material", "ann_mat.annotationtext"),
    ("inclusiontype", "ann_inc.annotationtext"),
    ("mineral", "tax_min.taxonomicclassifiername"),
    ("majorelem", "var.variablecode"),
];

/// List samples, optionally narrowed by classification filters
pub async fn list_samples(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> Result<Json<ResponseEnvelope<Vec<Sample>>>> {
    let mut builder = QueryBuilder::new(QueryTemplate::SamplesByGeoSetting.sql());

    for (name, column) in FILTER_COLUMNS {
        if let Some(values) = params.get(*name) {
            builder.add_in_filter_quoted(column, values)?;
        }
    }
    apply_pagination(&mut builder, &params)?;

    let rows: Vec<Sample> = state
        .db
        .query_rows(&builder.render(), builder.bind_values())
        .await?;
    Ok(Json(ResponseEnvelope::from_rows(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use georoc_common::db::templates::is_allowed_filter_column;

    #[test]
    fn test_every_filter_column_is_allow_listed() {
        for (_, column) in FILTER_COLUMNS {
            assert!(is_allowed_filter_column(column), "{}", column);
        }
    }

    #[test]
    fn test_rocktype_filter_renders_in_clause() {
        let mut builder = QueryBuilder::new(QueryTemplate::SamplesByGeoSetting.sql());
        builder
            .add_in_filter_quoted("tax_type.taxonomicclassifiername", "Basalt,Andesite")
            .unwrap();
        let sql = builder.render();
        assert!(sql.contains(
            "tax_type.taxonomicclassifiername IN ('Basalt','Andesite')"
        ));
    }

    #[test]
    fn test_injection_payload_is_rejected() {
        let mut builder = QueryBuilder::new(QueryTemplate::SamplesByGeoSetting.sql());
        let result =
            builder.add_in_filter_quoted("st.setting", "RIFT'); DROP TABLE odm2.sites;--");
        assert!(result.is_err());
    }
}
