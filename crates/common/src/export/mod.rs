//! Tabular export of FullData records
//!
//! Renders a sequence of denormalized records into the legacy GEOROC
//! wide-column layout, as CSV (RFC 4180 quoting) or XLSX (one worksheet,
//! one header row, scalars keep their type).

pub mod columns;

pub use columns::{schema, ColumnSchema};

use crate::errors::{AppError, Result};
use crate::model::FullData;
use rust_xlsxwriter::Workbook;
use std::str::FromStr;

/// Supported download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(AppError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// A typed cell; optional scalars render as empty cells
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    fn to_field(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format!("{}", n),
        }
    }

    fn from_opt_number(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }

    fn from_opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
            _ => CellValue::Empty,
        }
    }
}

/// Render records to the chosen format
pub fn format_fulldata(records: &[FullData], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => CsvFormatter::default().format(records),
        ExportFormat::Xlsx => XlsxFormatter.format(records),
    }
}

/// CSV writer with a configurable separator
pub struct CsvFormatter {
    separator: u8,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { separator: b',' }
    }
}

impl CsvFormatter {
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    pub fn format(&self, records: &[FullData]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.separator)
            .from_writer(Vec::new());

        writer
            .write_record(schema().headers())
            .map_err(|e| AppError::Format {
                message: e.to_string(),
            })?;

        for record in records {
            let row: Vec<String> = build_row(record).iter().map(CellValue::to_field).collect();
            writer.write_record(&row).map_err(|e| AppError::Format {
                message: e.to_string(),
            })?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Format {
                message: e.to_string(),
            })
    }
}

/// XLSX writer: one worksheet, header row, typed cells
pub struct XlsxFormatter;

impl XlsxFormatter {
    pub fn format(&self, records: &[FullData]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, header) in schema().headers().iter().enumerate() {
            worksheet
                .write_string(0, col as u16, header)
                .map_err(|e| AppError::Format {
                    message: e.to_string(),
                })?;
        }

        for (row_idx, record) in records.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            for (col, cell) in build_row(record).iter().enumerate() {
                let col = col as u16;
                let result = match cell {
                    CellValue::Empty => continue,
                    CellValue::Text(s) => worksheet.write_string(row, col, s),
                    CellValue::Number(n) => worksheet.write_number(row, col, *n),
                };
                result.map_err(|e| AppError::Format {
                    message: e.to_string(),
                })?;
            }
        }

        workbook.save_to_buffer().map_err(|e| AppError::Format {
            message: e.to_string(),
        })
    }
}

/// Map one FullData record onto the column schema
pub fn build_row(record: &FullData) -> Vec<CellValue> {
    let schema = schema();
    let mut row = vec![CellValue::Empty; schema.len()];

    for (idx, name) in columns::METADATA_COLUMNS.iter().enumerate() {
        row[idx] = metadata_cell(name, record);
    }

    // Chemical results: batches in order, results within the batch. A
    // duplicate item fills the next free alternate slot of its column.
    for (batch, items) in record.item_name.iter().enumerate() {
        for (pos, item) in items.iter().enumerate() {
            let Some(item) = item.as_deref() else { continue };
            let unit = record
                .units
                .get(batch)
                .and_then(|u| u.get(pos))
                .and_then(|u| u.as_deref())
                .unwrap_or("");
            let Some(value) = record
                .values
                .get(batch)
                .and_then(|v| v.get(pos))
                .and_then(|v| *v)
            else {
                continue;
            };

            let Some(main) = schema.column_index(item, unit) else {
                tracing::debug!(item, unit, "no export column for result item");
                continue;
            };

            match free_slot(&row, schema, main) {
                Some(slot) => row[slot] = CellValue::Number(value),
                None => {
                    tracing::debug!(item, unit, "all alternate slots taken, dropping value")
                }
            }
        }
    }

    row
}

fn free_slot(row: &[CellValue], schema: &ColumnSchema, main: usize) -> Option<usize> {
    if row[main] == CellValue::Empty {
        return Some(main);
    }
    schema
        .alternate_slots(main)
        .iter()
        .copied()
        .find(|&slot| row[slot] == CellValue::Empty)
}

fn metadata_cell(name: &str, record: &FullData) -> CellValue {
    match name {
        "YEAR" => join_cells(record.references.iter().map(|r| {
            r.year.map(|y| y.to_string())
        })),
        "CITATION" => join_cells(record.references.iter().map(short_citation)),
        "SAMPLE NAME" => join_opt(&record.sample_ids),
        "UNIQUE_ID" => CellValue::from_opt_text(record.unique_id.as_deref()),
        "LOCATION" => join_opt(&record.location_names),
        "LOCATION COMMENT" => CellValue::from_opt_text(
            record.location_precision_comment.as_deref(),
        ),
        "ELEVATION (MIN.)" => CellValue::from_opt_text(Some(&record.elevation_min)),
        "ELEVATION (MAX.)" => CellValue::from_opt_text(Some(&record.elevation_max)),
        "SAMPLING TECHNIQUE" => join_opt(&record.sampling_techniques),
        "DRILLING DEPTH (MIN.)" => CellValue::from_opt_number(record.drill_depth_min),
        "DRILLING DEPTH (MAX.)" => CellValue::from_opt_number(record.drill_depth_max),
        "LAND/SEA (SAMPLING)" => CellValue::from_opt_text(record.land_or_sea.as_deref()),
        "ROCK TYPE" => join_opt(&record.rock_types),
        "ROCK CLASS" => join_opt(&record.rock_classes),
        "ROCK TEXTURE" => join_opt(&record.rock_textures),
        "AGE (MIN.)" => CellValue::from_opt_number(record.age_min),
        "AGE (MAX.)" => CellValue::from_opt_number(record.age_max),
        "GEOLOGICAL AGE" => CellValue::from_opt_text(record.geological_age.as_deref()),
        "MATERIAL" => join_opt(&record.materials),
        "MINERAL" => join_opt(&record.minerals),
        "INCLUSION TYPE" => join_opt(&record.inclusion_types),
        "LATITUDE (MIN.)" => CellValue::from_opt_text(Some(&record.latitude_min)),
        "LATITUDE (MAX.)" => CellValue::from_opt_text(Some(&record.latitude_max)),
        "LONGITUDE (MIN.)" => CellValue::from_opt_text(Some(&record.longitude_min)),
        "LONGITUDE (MAX.)" => CellValue::from_opt_text(Some(&record.longitude_max)),
        "TECTONIC SETTING" => CellValue::from_opt_text(record.tectonic_setting.as_deref()),
        _ => CellValue::Empty,
    }
}

/// Short citation form: first author's last name plus year
fn short_citation(reference: &crate::model::Reference) -> Option<String> {
    let author = reference
        .authors
        .as_ref()
        .and_then(|a| a.first())
        .and_then(|a| a.last_name.clone());
    match (author, reference.year) {
        (Some(name), Some(year)) => Some(format!("{} [{}]", name, year)),
        (Some(name), None) => Some(name),
        (None, _) => reference.title.clone(),
    }
}

fn join_cells(parts: impl Iterator<Item = Option<String>>) -> CellValue {
    let joined: Vec<String> = parts.flatten().collect();
    if joined.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(joined.join("; "))
    }
}

fn join_opt(values: &[Option<String>]) -> CellValue {
    join_cells(values.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fulldata::Reference;
    use crate::model::Author;
    use serde_json::json;

    fn record() -> FullData {
        let mut record: FullData = serde_json::from_value(json!({
            "sampleNum": 1,
            "uniqueID": "u-1",
            "sampleIDs": ["SAMPLE-A"],
            "locationNames": ["AFRICA", "KENYA"],
            "latitude": 1.0,
            "longitude": 36.0,
            "tectonicSetting": "RIFT",
            "landOrSea": "SAE",
            "ageMin": 1.5,
            "ageMax": 2.5,
            "geologicalAge": "PLEISTOCENE",
            "drillDepthMin": null,
            "drillDepthMax": null,
            "locationPrecisionComment":
                "LATITUDE_MIN=0.5;LATITUDE_MAX=1.5;LONGITUDE_MIN=35.5;LONGITUDE_MAX=36.5",
            "elevationPrecisionComment": "ELEVATION_MIN=900;ELEVATION_MAX=1200"
        }))
        .unwrap();
        record.references = vec![Reference {
            citation_id: Some(42),
            title: Some("Rift basalts".into()),
            journal: None,
            year: Some(1999),
            pages: None,
            doi: Some("10.1000/rift".into()),
            authors: Some(vec![Author {
                person_id: Some(1),
                first_name: Some("A".into()),
                last_name: Some("Smith".into()),
                order: Some(1),
            }]),
        }];
        record.item_name = vec![vec![Some("SIO2".into()), Some("LI".into())]];
        record.units = vec![vec![Some("WT%".into()), Some("PPM".into())]];
        record.values = vec![vec![Some(48.7), Some(11.2)]];
        record.finalize();
        record
    }

    #[test]
    fn test_row_width_matches_header() {
        let row = build_row(&record());
        assert_eq!(row.len(), schema().len());
    }

    #[test]
    fn test_metadata_cells() {
        let s = schema();
        let row = build_row(&record());
        assert_eq!(row[0], CellValue::Text("1999".into()));
        assert_eq!(row[1], CellValue::Text("Smith [1999]".into()));
        assert_eq!(row[2], CellValue::Text("SAMPLE-A".into()));
        assert_eq!(row[3], CellValue::Text("u-1".into()));
        assert_eq!(row[4], CellValue::Text("AFRICA; KENYA".into()));
        let lat_min = s.position("LATITUDE (MIN.)").unwrap();
        assert_eq!(row[lat_min], CellValue::Text("0.5".into()));
        let elev_max = s.position("ELEVATION (MAX.)").unwrap();
        assert_eq!(row[elev_max], CellValue::Text("1200".into()));
    }

    #[test]
    fn test_chemical_cells_land_in_their_columns() {
        let s = schema();
        let row = build_row(&record());
        assert_eq!(
            row[s.position("SIO2(WT%)").unwrap()],
            CellValue::Number(48.7)
        );
        assert_eq!(row[s.position("LI(PPM)").unwrap()], CellValue::Number(11.2));
    }

    #[test]
    fn test_duplicate_item_fills_alternate_slot() {
        let mut r = record();
        r.item_name = vec![vec![Some("LI".into())], vec![Some("LI".into())]];
        r.units = vec![vec![Some("PPM".into())], vec![Some("PPM".into())]];
        r.values = vec![vec![Some(10.0)], vec![Some(12.0)]];
        let s = schema();
        let row = build_row(&r);
        let li = s.position("LI(PPM)").unwrap();
        assert_eq!(row[li], CellValue::Number(10.0));
        assert_eq!(row[li + 1], CellValue::Number(12.0));
        assert_eq!(row[li + 2], CellValue::Empty);
    }

    #[test]
    fn test_csv_row_and_field_counts() {
        let records = vec![record(), record(), record()];
        let bytes = format_fulldata(&records, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), records.len() + 1);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());
        let field_counts: Vec<usize> =
            reader.records().map(|r| r.unwrap().len()).collect();
        assert!(field_counts.iter().all(|&n| n == schema().len()));
    }

    #[test]
    fn test_csv_header_line_is_the_contract() {
        let bytes = format_fulldata(&[], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("YEAR,CITATION,SAMPLE NAME,UNIQUE_ID,LOCATION"));
    }

    #[test]
    fn test_csv_quotes_embedded_separators() {
        let mut r = record();
        r.sample_ids = vec![Some("A, with comma".into())];
        let bytes = format_fulldata(&[r], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"A, with comma\""));
    }

    #[test]
    fn test_csv_custom_separator() {
        let bytes = CsvFormatter::new(b';').format(&[record()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.lines().next().unwrap().starts_with("YEAR;CITATION"));
    }

    #[test]
    fn test_xlsx_produces_a_workbook() {
        let bytes = format_fulldata(&[record()], ExportFormat::Xlsx).unwrap();
        // XLSX is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
