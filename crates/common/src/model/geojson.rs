//! GeoJSON projection of site rows
//!
//! The GeoJSON path stays free-form on purpose: the raw joined row becomes
//! the feature properties, minus latitude/longitude which are promoted into
//! the point geometry as `[longitude, latitude]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`, in that order
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: String,
    /// Decimal row index as a string
    pub id: String,
    pub geometry: GeoJsonPoint,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "numberMatched")]
    pub number_matched: usize,
    #[serde(rename = "numberReturned")]
    pub number_returned: usize,
    pub features: Vec<GeoJsonFeature>,
}

impl GeoJsonFeatureCollection {
    /// Build a feature collection from raw site rows
    ///
    /// Rows without a numeric latitude and longitude are skipped; the
    /// remaining fields travel as feature properties.
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let matched = rows.len();
        let features: Vec<GeoJsonFeature> = rows
            .into_iter()
            .filter_map(feature_from_row)
            .enumerate()
            .map(|(idx, mut feature)| {
                feature.id = idx.to_string();
                feature
            })
            .collect();

        Self {
            kind: "FeatureCollection".to_string(),
            number_matched: matched,
            number_returned: features.len(),
            features,
        }
    }
}

fn feature_from_row(mut row: Map<String, Value>) -> Option<GeoJsonFeature> {
    let latitude = row.remove("latitude").and_then(|v| v.as_f64())?;
    let longitude = row.remove("longitude").and_then(|v| v.as_f64())?;

    Some(GeoJsonFeature {
        kind: "Feature".to_string(),
        id: String::new(),
        geometry: GeoJsonPoint {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        },
        properties: row,
    })
}
