//! Domain records for the GEOROC read projections
//!
//! Every type here deserializes from the lowercase column names the JSON
//! envelope produces (`row_to_json` over unquoted aliases) and serializes
//! to the public API field names.

pub mod fulldata;
pub mod geojson;

pub use fulldata::{FullData, Reference};
pub use geojson::{GeoJsonFeature, GeoJsonFeatureCollection, GeoJsonPoint};

use serde::{Deserialize, Serialize};

/// Standard response wrapper: `{numItems, data}`
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<T> {
    #[serde(rename = "numItems")]
    pub num_items: usize,
    pub data: T,
}

impl<T> ResponseEnvelope<Vec<T>> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            num_items: rows.len(),
            data: rows,
        }
    }
}

/// An author or editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename(serialize = "personID", deserialize = "personid"))]
    pub person_id: i64,
    #[serde(rename(serialize = "firstName", deserialize = "personfirstname"))]
    pub first_name: Option<String>,
    #[serde(rename(serialize = "lastName", deserialize = "personlastname"))]
    pub last_name: Option<String>,
}

/// An author entry inside a citation, as aggregated by the citation
/// templates (`json_build_object` keys match the serialized names)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "personID")]
    pub person_id: Option<i64>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub order: Option<i32>,
}

/// A published citation with its authors and DOI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename(serialize = "citationID", deserialize = "citationid"))]
    pub citation_id: i64,
    pub title: Option<String>,
    pub publisher: Option<String>,
    #[serde(rename(serialize = "year", deserialize = "publicationyear"))]
    pub year: Option<i32>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    #[serde(rename(serialize = "firstPage", deserialize = "firstpage"))]
    pub first_page: Option<String>,
    #[serde(rename(serialize = "lastPage", deserialize = "lastpage"))]
    pub last_page: Option<String>,
    #[serde(rename(serialize = "bookTitle", deserialize = "booktitle"))]
    pub book_title: Option<String>,
    pub editors: Option<String>,
    pub doi: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<Author>>,
}

/// A sampling location (parent of samples)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename(serialize = "samplingFeatureID", deserialize = "samplingfeatureid"))]
    pub sampling_feature_id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename(serialize = "spatialReferenceID", deserialize = "spatialreferenceid"))]
    pub spatial_reference_id: Option<i64>,
    #[serde(rename(serialize = "locationPrecision", deserialize = "locationprecision"))]
    pub location_precision: Option<f64>,
    #[serde(rename(
        serialize = "locationPrecisionComment",
        deserialize = "locationprecisioncomment"
    ))]
    pub location_precision_comment: Option<String>,
    #[serde(rename(serialize = "siteDescription", deserialize = "sitedescription"))]
    pub site_description: Option<String>,
    pub setting: Option<String>,
}

/// A distinct geological setting value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSetting {
    pub setting: Option<String>,
}

/// A physical sample with its aggregated classifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename(serialize = "samplingFeatureID", deserialize = "samplingfeatureid"))]
    pub sampling_feature_id: i64,
    #[serde(rename(serialize = "uuid", deserialize = "samplingfeatureuuid"))]
    pub uuid: Option<String>,
    #[serde(rename(serialize = "name", deserialize = "samplingfeaturename"))]
    pub name: Option<String>,
    #[serde(rename(serialize = "description", deserialize = "samplingfeaturedescription"))]
    pub description: Option<String>,
    #[serde(rename(serialize = "geometryWKT", deserialize = "featuregeometrywkt"))]
    pub geometry_wkt: Option<String>,
    #[serde(rename(serialize = "elevation", deserialize = "elevation_m"))]
    pub elevation_m: Option<f64>,
    #[serde(rename(serialize = "elevationPrecision", deserialize = "elevationprecision"))]
    pub elevation_precision: Option<f64>,
    pub setting: Option<String>,
    #[serde(
        default,
        rename(serialize = "locationNames1", deserialize = "location_names1")
    )]
    pub location_names1: Vec<Option<String>>,
    #[serde(
        default,
        rename(serialize = "locationNames2", deserialize = "location_names2")
    )]
    pub location_names2: Vec<Option<String>>,
    #[serde(
        default,
        rename(serialize = "locationNames3", deserialize = "location_names3")
    )]
    pub location_names3: Vec<Option<String>>,
    #[serde(default, rename(serialize = "rockTypes", deserialize = "rock_types"))]
    pub rock_types: Vec<Option<String>>,
    #[serde(default, rename(serialize = "rockClasses", deserialize = "rock_classes"))]
    pub rock_classes: Vec<Option<String>>,
    #[serde(default)]
    pub minerals: Vec<Option<String>>,
    #[serde(default)]
    pub materials: Vec<Option<String>>,
    #[serde(
        default,
        rename(serialize = "inclusionTypes", deserialize = "inclusion_types")
    )]
    pub inclusion_types: Vec<Option<String>>,
    #[serde(
        default,
        rename(serialize = "samplingTechniques", deserialize = "sampling_techniques")
    )]
    pub sampling_techniques: Vec<Option<String>>,
    #[serde(default, rename(serialize = "rimOrCore", deserialize = "rim_or_core"))]
    pub rim_or_core: Vec<Option<String>>,
}

/// A measured chemical item (variable code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename(serialize = "variableCode", deserialize = "variablecode"))]
    pub variable_code: String,
}

/// A variable type classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementType {
    #[serde(rename(serialize = "variableTypeCode", deserialize = "variabletypecode"))]
    pub variable_type_code: String,
}

/// Catalog-wide aggregate counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub citations: i64,
    pub samples: i64,
    pub analyses: i64,
    pub results: i64,
}

/// Decode the hierarchical location level from a locationhierarchy id
///
/// The level lives in the last three characters of the decimal rendering:
/// `"100"` is a continent (1), `"200"` a country (2), `"300"` a region (3).
pub fn location_level(hierarchy: i64) -> Option<u8> {
    let digits = hierarchy.to_string();
    if digits.len() < 3 {
        return None;
    }
    match &digits[digits.len() - 3..] {
        "100" => Some(1),
        "200" => Some(2),
        "300" => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_level_from_hierarchy_suffix() {
        assert_eq!(location_level(5100), Some(1));
        assert_eq!(location_level(5200), Some(2));
        assert_eq!(location_level(12300), Some(3));
        assert_eq!(location_level(5150), None);
        assert_eq!(location_level(42), None);
    }

    #[test]
    fn test_person_round_trip_names() {
        let row = json!({
            "personid": 7,
            "personfirstname": "Alfred",
            "personlastname": "Wegener"
        });
        let person: Person = serde_json::from_value(row).unwrap();
        assert_eq!(person.person_id, 7);

        let out = serde_json::to_value(&person).unwrap();
        assert_eq!(out["personID"], 7);
        assert_eq!(out["lastName"], "Wegener");
    }

    #[test]
    fn test_citation_decodes_aggregated_authors() {
        let row = json!({
            "citationid": 42,
            "title": "Basalt geochemistry",
            "publisher": null,
            "publicationyear": 1999,
            "journal": "J. Pet.",
            "volume": "12",
            "issue": null,
            "firstpage": "1",
            "lastpage": "20",
            "booktitle": null,
            "editors": null,
            "doi": "10.1000/xyz",
            "authors": [
                {"personID": 1, "firstName": "A", "lastName": "B", "order": 1}
            ]
        });
        let citation: Citation = serde_json::from_value(row).unwrap();
        assert_eq!(citation.citation_id, 42);
        assert_eq!(citation.authors.as_ref().unwrap().len(), 1);

        let out = serde_json::to_value(&citation).unwrap();
        assert_eq!(out["citationID"], 42);
        assert_eq!(out["year"], 1999);
    }

    #[test]
    fn test_sample_defaults_missing_aggregates() {
        let row = json!({
            "samplingfeatureid": 9,
            "samplingfeatureuuid": "u-9",
            "samplingfeaturename": "S9",
            "samplingfeaturedescription": "Sample",
            "featuregeometrywkt": "POINT (9 9)",
            "elevation_m": 120.5,
            "elevationprecision": null,
            "setting": "SUBDUCTION ZONE"
        });
        let sample: Sample = serde_json::from_value(row).unwrap();
        assert!(sample.rock_types.is_empty());
        assert!(sample.location_names1.is_empty());
    }

    #[test]
    fn test_envelope_counts_rows() {
        let envelope = ResponseEnvelope::from_rows(vec![1, 2, 3]);
        assert_eq!(envelope.num_items, 3);
        let out = serde_json::to_value(&envelope).unwrap();
        assert_eq!(out["numItems"], 3);
        assert_eq!(out["data"], json!([1, 2, 3]));
    }
}
