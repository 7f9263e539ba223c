//! The legacy GEOROC export column schema
//!
//! The header order is a stable public contract: metadata prefix, oxide
//! weight-percent columns, element ppm columns (each with four alternate
//! "values or methods" slots), radiogenic isotope ratios, stable isotopes,
//! mineral endmember mol% and computed U-Pb ages. Tests pin the layout.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of alternate value-or-method slots per ppm element column
pub const ALTERNATE_SLOTS: usize = 4;

/// Sample metadata columns, in contract order
pub const METADATA_COLUMNS: &[&str] = &[
    "YEAR",
    "CITATION",
    "SAMPLE NAME",
    "UNIQUE_ID",
    "LOCATION",
    "LOCATION COMMENT",
    "ELEVATION (MIN.)",
    "ELEVATION (MAX.)",
    "SAMPLING TECHNIQUE",
    "DRILLING DEPTH (MIN.)",
    "DRILLING DEPTH (MAX.)",
    "LAND/SEA (SAMPLING)",
    "ROCK TYPE",
    "ROCK CLASS",
    "ROCK TEXTURE",
    "AGE (MIN.)",
    "AGE (MAX.)",
    "GEOLOGICAL AGE",
    "MATERIAL",
    "MINERAL",
    "INCLUSION TYPE",
    "LATITUDE (MIN.)",
    "LATITUDE (MAX.)",
    "LONGITUDE (MIN.)",
    "LONGITUDE (MAX.)",
    "TECTONIC SETTING",
];

/// Major-element oxides, reported in weight percent
pub const OXIDES: &[&str] = &[
    "SIO2", "TIO2", "AL2O3", "CR2O3", "FE2O3", "FEO", "FEOT", "CAO", "MGO", "MNO", "NIO",
    "K2O", "NA2O", "P2O5", "H2O", "H2OP", "H2OM", "CO2", "F", "CL", "SO3", "LOI", "S",
];

/// Trace elements and isotope masses, reported in ppm
pub const ELEMENTS_PPM: &[&str] = &[
    "LI", "BE", "NA", "MG", "AL", "P", "S", "K", "CA", "SC", "TI", "V", "CR", "MN", "FE",
    "CO", "NI", "CU", "ZN", "GA", "GE", "AS", "SE", "BR", "RB", "SR", "Y", "ZR", "NB",
    "MO", "PD", "AG", "CD", "IN", "SN", "SB", "TE", "CS", "BA", "LA", "CE", "PR", "ND",
    "SM", "EU", "GD", "TB", "DY", "HO", "ER", "TM", "YB", "LU", "HF", "TA", "W", "RE",
    "PT", "AU", "HG", "TL", "PB", "PB206", "PB207", "PB208", "BI", "TH", "U", "U234",
    "U235", "U238",
];

/// Radiogenic isotope ratios
pub const ISOTOPE_RATIOS: &[&str] = &[
    "ND143_ND144",
    "EPSILON_ND",
    "SR87_SR86",
    "PB206_PB204",
    "PB207_PB204",
    "PB208_PB204",
    "PB207_PB206",
    "PB208_PB206",
    "HF176_HF177",
    "EPSILON_HF",
    "PB206_U238",
    "PB207_U235",
];

/// Stable isotope deltas
pub const STABLE_ISOTOPES: &[&str] = &["D13C_VPDB", "D18O_VPDB", "D18O_VSMOW", "D34S_CDT"];

/// Mineral endmembers, reported in mol percent
pub const ENDMEMBERS: &[&str] = &["AN", "AB", "OR", "FO", "FA", "EN", "FS", "WO"];

/// Computed U-Pb ages, reported in Ma
pub const UPB_AGES: &[&str] = &["AGE_PB206_U238", "AGE_PB207_U235", "AGE_PB207_PB206"];

/// The resolved export schema: ordered headers plus lookup tables
pub struct ColumnSchema {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    /// Main ppm column index -> indexes of its alternate slots
    alternates: HashMap<usize, Vec<usize>>,
}

impl ColumnSchema {
    fn build() -> Self {
        let mut headers: Vec<String> = Vec::new();
        let mut alternates = HashMap::new();

        headers.extend(METADATA_COLUMNS.iter().map(|c| c.to_string()));
        headers.extend(OXIDES.iter().map(|o| format!("{}(WT%)", o)));

        for element in ELEMENTS_PPM {
            let main = headers.len();
            headers.push(format!("{}(PPM)", element));
            let slots: Vec<usize> = (0..ALTERNATE_SLOTS)
                .map(|slot| {
                    headers.push(format!("{}(PPM)_ALT{}", element, slot + 1));
                    main + slot + 1
                })
                .collect();
            alternates.insert(main, slots);
        }

        headers.extend(ISOTOPE_RATIOS.iter().map(|r| r.to_string()));
        headers.extend(STABLE_ISOTOPES.iter().map(|s| s.to_string()));
        headers.extend(ENDMEMBERS.iter().map(|e| format!("{}(MOL%)", e)));
        headers.extend(UPB_AGES.iter().map(|a| format!("{}(MA)", a)));

        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        Self {
            headers,
            index,
            alternates,
        }
    }

    /// The full ordered header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Position of an exact header name
    pub fn position(&self, header: &str) -> Option<usize> {
        self.index.get(header).copied()
    }

    /// Canonical itemName/unit -> column index mapping
    ///
    /// The unit picks the column family; anything unrecognized falls back
    /// to a direct header match (isotope ratios and deltas carry their
    /// column name as the item name).
    pub fn column_index(&self, item_name: &str, unit: &str) -> Option<usize> {
        let item = item_name.trim().to_uppercase();
        let key = match unit.trim().to_uppercase().as_str() {
            "WT%" => format!("{}(WT%)", item),
            "PPM" => format!("{}(PPM)", item),
            "MOL%" => format!("{}(MOL%)", item),
            "MA" => format!("{}(MA)", item),
            _ => item.clone(),
        };
        self.position(&key).or_else(|| self.position(&item))
    }

    /// Alternate slots that belong to a main ppm column
    pub fn alternate_slots(&self, main: usize) -> &[usize] {
        self.alternates
            .get(&main)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The process-wide schema instance
pub fn schema() -> &'static ColumnSchema {
    static SCHEMA: OnceLock<ColumnSchema> = OnceLock::new();
    SCHEMA.get_or_init(ColumnSchema::build)
}
