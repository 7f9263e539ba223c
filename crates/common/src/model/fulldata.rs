//! The denormalized FullData projection
//!
//! One record per sampling feature, with every one-to-many relation
//! flattened into arrays by the FullData template. Field names match the
//! quoted SQL aliases, so the record both decodes from the envelope row
//! and serializes to the wire unchanged.
//!
//! Latitude/longitude/elevation bounds are not stored as columns upstream;
//! they hide in delimited comment strings
//! (`LATITUDE_MIN=..;LATITUDE_MAX=..`, `ELEVATION_MIN=..;ELEVATION_MAX=..`)
//! and are parsed defensively after decoding: a mismatch yields an empty
//! string, never an error.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::Author;

/// Placeholder standard name when a result carries no standard
pub const UNKNOWN_STANDARD: &str = "Unknown";

/// Placeholder standard value when a result carries no standard
pub const MISSING_STANDARD_VALUE: f64 = -999.0;

/// A citation attached to a sample, with DOI and authors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "citationID")]
    pub citation_id: Option<i64>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<Author>>,
}

/// Site data nested inside a FullData record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub setting: Option<String>,
    #[serde(rename = "locationPrecision")]
    pub location_precision: Option<f64>,
    #[serde(rename = "locationPrecisionComment")]
    pub location_precision_comment: Option<String>,
}

/// The full denormalized record for one sampling feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullData {
    #[serde(rename = "sampleNum")]
    pub sample_num: i64,
    #[serde(rename = "uniqueID")]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub batches: Vec<i64>,
    #[serde(rename = "sampleIDs", default)]
    pub sample_ids: Vec<Option<String>>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(rename = "locationNames", default)]
    pub location_names: Vec<Option<String>>,
    #[serde(rename = "locationTypes", default)]
    pub location_types: Vec<Option<String>>,
    #[serde(rename = "locData", default)]
    pub loc_data: Option<Vec<LocationData>>,

    /// Raw comment carrying ELEVATION_MIN / ELEVATION_MAX
    #[serde(rename = "elevationPrecisionComment", default)]
    pub elevation_precision_comment: Option<String>,
    /// Raw comment carrying LATITUDE_* / LONGITUDE_* bounds
    #[serde(rename = "locationPrecisionComment", default)]
    pub location_precision_comment: Option<String>,

    // Parsed bounds; absent in the database row, filled by `finalize`
    #[serde(rename = "elevationMin", default)]
    pub elevation_min: String,
    #[serde(rename = "elevationMax", default)]
    pub elevation_max: String,
    #[serde(rename = "latitudeMin", default)]
    pub latitude_min: String,
    #[serde(rename = "latitudeMax", default)]
    pub latitude_max: String,
    #[serde(rename = "longitudeMin", default)]
    pub longitude_min: String,
    #[serde(rename = "longitudeMax", default)]
    pub longitude_max: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "tectonicSetting")]
    pub tectonic_setting: Option<String>,
    #[serde(rename = "landOrSea")]
    pub land_or_sea: Option<String>,

    #[serde(rename = "rockTypes", default)]
    pub rock_types: Vec<Option<String>>,
    #[serde(rename = "rockClasses", default)]
    pub rock_classes: Vec<Option<String>>,
    #[serde(rename = "rockTextures", default)]
    pub rock_textures: Vec<Option<String>>,
    #[serde(rename = "ageMin")]
    pub age_min: Option<f64>,
    #[serde(rename = "ageMax")]
    pub age_max: Option<f64>,
    #[serde(rename = "geologicalAge")]
    pub geological_age: Option<String>,
    #[serde(default)]
    pub materials: Vec<Option<String>>,
    #[serde(default)]
    pub minerals: Vec<Option<String>>,
    #[serde(rename = "inclusionTypes", default)]
    pub inclusion_types: Vec<Option<String>>,
    #[serde(rename = "samplingTechniques", default)]
    pub sampling_techniques: Vec<Option<String>>,
    #[serde(rename = "drillDepthMin")]
    pub drill_depth_min: Option<f64>,
    #[serde(rename = "drillDepthMax")]
    pub drill_depth_max: Option<f64>,

    #[serde(default)]
    pub methods: Vec<Option<String>>,
    #[serde(rename = "methodComments", default)]
    pub method_comments: Vec<Option<String>>,
    #[serde(default)]
    pub institutions: Vec<Option<String>>,

    // Result matrices, indexed by batch then by result within the batch
    #[serde(rename = "itemName", default)]
    pub item_name: Vec<Vec<Option<String>>>,
    #[serde(rename = "itemGroup", default)]
    pub item_group: Vec<Vec<Option<String>>>,
    #[serde(default)]
    pub values: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub units: Vec<Vec<Option<String>>>,
    #[serde(rename = "standardNames", default)]
    pub standard_names: Vec<Vec<Option<String>>>,
    #[serde(rename = "standardValues", default)]
    pub standard_values: Vec<Vec<Option<f64>>>,
}

impl FullData {
    /// Fill the derived fields after decoding the database row
    ///
    /// Parses the bound comments and squares up the standard matrices so
    /// every batch has at least the placeholder standard.
    pub fn finalize(&mut self) {
        if let Some(comment) = self.location_precision_comment.clone() {
            self.latitude_min = parse_bound(&comment, "LATITUDE_MIN");
            self.latitude_max = parse_bound(&comment, "LATITUDE_MAX");
            self.longitude_min = parse_bound(&comment, "LONGITUDE_MIN");
            self.longitude_max = parse_bound(&comment, "LONGITUDE_MAX");
        }
        if let Some(comment) = self.elevation_precision_comment.clone() {
            self.elevation_min = parse_bound(&comment, "ELEVATION_MIN");
            self.elevation_max = parse_bound(&comment, "ELEVATION_MAX");
        }

        let batch_count = self.item_name.len();
        self.standard_names.resize(batch_count, Vec::new());
        self.standard_values.resize(batch_count, Vec::new());
        for names in &mut self.standard_names {
            if names.iter().all(|n| n.is_none()) {
                *names = vec![Some(UNKNOWN_STANDARD.to_string())];
            }
        }
        for values in &mut self.standard_values {
            if values.iter().all(|v| v.is_none()) {
                *values = vec![Some(MISSING_STANDARD_VALUE)];
            }
        }
    }
}

/// Extract a named numeric bound from a delimited comment string
///
/// The pattern is `<NAME>=(-?\d+\.?\d*)`, anchored only by the literal
/// prefix; the empty string signals "no bound".
pub fn parse_bound(comment: &str, name: &str) -> String {
    let pattern = format!(r"{}=(-?\d+\.?\d*)", name);
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.captures(comment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bound_matches_first_group() {
        let comment = "LATITUDE_MIN=-12.5;LATITUDE_MAX=13;LONGITUDE_MIN=100.;LONGITUDE_MAX=101.25";
        assert_eq!(parse_bound(comment, "LATITUDE_MIN"), "-12.5");
        assert_eq!(parse_bound(comment, "LATITUDE_MAX"), "13");
        assert_eq!(parse_bound(comment, "LONGITUDE_MIN"), "100.");
        assert_eq!(parse_bound(comment, "LONGITUDE_MAX"), "101.25");
    }

    #[test]
    fn test_parse_bound_mismatch_is_empty() {
        assert_eq!(parse_bound("no bounds here", "LATITUDE_MIN"), "");
        assert_eq!(parse_bound("LATITUDE_MIN=abc", "LATITUDE_MIN"), "");
        assert_eq!(parse_bound("", "ELEVATION_MIN"), "");
    }

    fn minimal_record() -> FullData {
        serde_json::from_value(json!({
            "sampleNum": 1,
            "uniqueID": "u-1",
            "latitude": 10.0,
            "longitude": 20.0,
            "tectonicSetting": null,
            "landOrSea": "SAE",
            "ageMin": null,
            "ageMax": null,
            "geologicalAge": null,
            "drillDepthMin": null,
            "drillDepthMax": null
        }))
        .unwrap()
    }

    #[test]
    fn test_finalize_parses_comment_bounds() {
        let mut record = minimal_record();
        record.location_precision_comment =
            Some("LATITUDE_MIN=-1;LATITUDE_MAX=1;LONGITUDE_MIN=-2;LONGITUDE_MAX=2".into());
        record.elevation_precision_comment =
            Some("ELEVATION_MIN=100;ELEVATION_MAX=2500".into());
        record.finalize();
        assert_eq!(record.latitude_min, "-1");
        assert_eq!(record.longitude_max, "2");
        assert_eq!(record.elevation_min, "100");
        assert_eq!(record.elevation_max, "2500");
    }

    #[test]
    fn test_finalize_defaults_missing_standards() {
        let mut record = minimal_record();
        record.item_name = vec![
            vec![Some("SIO2".into())],
            vec![Some("LI".into()), Some("BE".into())],
        ];
        record.standard_names = vec![vec![Some("JB-2".into())]];
        record.standard_values = vec![vec![Some(51.2)]];
        record.finalize();

        assert_eq!(record.standard_names.len(), 2);
        assert_eq!(
            record.standard_names[1],
            vec![Some(UNKNOWN_STANDARD.to_string())]
        );
        assert_eq!(
            record.standard_values[1],
            vec![Some(MISSING_STANDARD_VALUE)]
        );
        // Existing standards are untouched
        assert_eq!(record.standard_names[0], vec![Some("JB-2".to_string())]);
    }

    #[test]
    fn test_decodes_result_matrices() {
        let mut value = json!({
            "sampleNum": 5,
            "uniqueID": "u-5",
            "latitude": null,
            "longitude": null,
            "tectonicSetting": null,
            "landOrSea": null,
            "ageMin": null,
            "ageMax": null,
            "geologicalAge": null,
            "drillDepthMin": null,
            "drillDepthMax": null
        });
        value["itemName"] = json!([["SIO2", "LI"]]);
        value["values"] = json!([[49.2, 10.4]]);
        value["units"] = json!([["WT%", "PPM"]]);
        let record: FullData = serde_json::from_value(value).unwrap();
        assert_eq!(record.item_name[0].len(), 2);
        assert_eq!(record.values[0][1], Some(10.4));
    }
}
