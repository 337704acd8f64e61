//! # Size Catalog Data Model
//!
//! This module defines the reference data the size finder works over: size
//! charts, measurement guides, and the fixed dimension sets collected per
//! (gender, category) pair.
//!
//! ## Core Concepts
//!
//! - **SizeChart**: every size table, one per (gender, category) pair
//! - **CategoryTable**: an *ordered* sequence of size entries; insertion
//!   order doubles as the tie-break order during matching
//! - **SizeEntry**: a size label with its ideal dimension values in
//!   centimeters
//! - **MeasurementGuide**: display text telling the shopper how to take a
//!   measurement
//!
//! The catalog ships with built-in tables but can be replaced wholesale from
//! a JSON file at startup, so chart updates never require a code change.
//!
//! ## Usage
//!
//! ```rust
//! use size_finder::catalog::{default_catalog, dimensions_for, Category, Gender};
//!
//! let catalog = default_catalog();
//! let dresses = catalog
//!     .chart
//!     .table(Gender::Women, Category::Dresses)
//!     .expect("built-in table");
//! assert_eq!(dresses.sizes[3].label, "M");
//!
//! let dims = dimensions_for(Gender::Women, Category::Dresses);
//! assert_eq!(dims.len(), 4);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use tracing::{debug, warn};

/// Shopper gender, used to select a size table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

/// Garment category, used to select a size table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Trousers,
    Dresses,
}

impl Gender {
    /// Lowercase name as it appears in URLs, JSON and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
        }
    }
}

impl Category {
    /// Lowercase name as it appears in URLs, JSON and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Trousers => "trousers",
            Category::Dresses => "dresses",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display guide for one body dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementGuide {
    /// Short human title (e.g. "Shoulder Width")
    pub title: String,
    /// Instructions for taking the measurement
    pub description: String,
}

/// A size label with its ideal dimension values, all in centimeters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeEntry {
    /// The size label (e.g. "XS", "M", "XXL")
    pub label: String,
    /// Dimension name → ideal value in centimeters
    pub dimensions: HashMap<String, f64>,
}

impl SizeEntry {
    /// Create an entry with just a label
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            dimensions: HashMap::new(),
        }
    }

    /// Add an ideal dimension value (centimeters) to this entry
    pub fn with_dimension(mut self, name: &str, ideal_cm: f64) -> Self {
        self.dimensions.insert(name.to_string(), ideal_cm);
        self
    }
}

/// Ordered size table for one (gender, category) pair
///
/// The order of `sizes` is the chart order: matching walks it front to back
/// and keeps the earliest entry on a tie, so the order here is a contract,
/// not an accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub gender: Gender,
    pub category: Category,
    pub sizes: Vec<SizeEntry>,
}

impl CategoryTable {
    /// Create an empty table for a (gender, category) pair
    pub fn new(gender: Gender, category: Category) -> Self {
        Self {
            gender,
            category,
            sizes: Vec::new(),
        }
    }

    /// Append a size entry, preserving chart order
    pub fn with_size(mut self, entry: SizeEntry) -> Self {
        self.sizes.push(entry);
        self
    }
}

/// The full reference chart: one table per covered (gender, category) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeChart {
    pub tables: Vec<CategoryTable>,
}

impl SizeChart {
    /// Look up the table for a (gender, category) pair, if the chart has one
    pub fn table(&self, gender: Gender, category: Category) -> Option<&CategoryTable> {
        self.tables
            .iter()
            .find(|t| t.gender == gender && t.category == category)
    }
}

/// Everything the application loads at startup: chart plus guides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeCatalog {
    pub chart: SizeChart,
    /// Dimension name → how-to-measure guide (display only, never matched on)
    pub guides: HashMap<String, MeasurementGuide>,
}

impl SizeCatalog {
    /// Parse a catalog from its JSON form and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: SizeCatalog =
            serde_json::from_str(json).context("Failed to parse size catalog JSON")?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a JSON file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read size catalog file: {path}"))?;
        let catalog = Self::from_json_str(&content)?;
        debug!(path = %path, tables = catalog.chart.tables.len(), "Loaded size catalog from file");
        Ok(catalog)
    }

    /// Look up the guide text for a dimension
    pub fn guide(&self, dimension: &str) -> Option<&MeasurementGuide> {
        self.guides.get(dimension)
    }

    /// Check the chart invariants
    ///
    /// Non-positive ideal values are rejected. Entries within one table are
    /// expected to share a dimension key set; a mismatch is only warned
    /// about, since matching still works over whatever keys are present.
    fn validate(&self) -> Result<()> {
        for table in &self.chart.tables {
            for entry in &table.sizes {
                for (name, value) in &entry.dimensions {
                    if *value <= 0.0 {
                        return Err(anyhow::anyhow!(
                            "Invalid size catalog: {}/{} size {} has non-positive {} value {}",
                            table.gender,
                            table.category,
                            entry.label,
                            name,
                            value
                        ));
                    }
                }
            }

            if let Some(first) = table.sizes.first() {
                let reference: HashSet<&String> = first.dimensions.keys().collect();
                for entry in &table.sizes[1..] {
                    let keys: HashSet<&String> = entry.dimensions.keys().collect();
                    if keys != reference {
                        warn!(
                            gender = %table.gender,
                            category = %table.category,
                            label = %entry.label,
                            "Size entry uses a different dimension set than the first entry in its table"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Fixed dimension sets per (gender, category) pair; slice order is the
/// display order of the input fields
const DIMENSION_SETS: &[(Gender, Category, &[&str])] = &[
    (Gender::Men, Category::Tops, &["shoulder", "chest", "waist", "neck"]),
    (Gender::Men, Category::Trousers, &["waist", "hips", "thigh", "inseam"]),
    (Gender::Women, Category::Tops, &["shoulder", "bust", "waist", "neck"]),
    (Gender::Women, Category::Dresses, &["bust", "waist", "hips", "length"]),
    (Gender::Women, Category::Trousers, &["waist", "hips", "thigh", "inseam"]),
];

/// The dimensions collected for a (gender, category) pair
///
/// Purely a table lookup. Pairs without a row (the chart does not cover
/// men's dresses) resolve to an empty slice rather than a guess.
pub fn dimensions_for(gender: Gender, category: Category) -> &'static [&'static str] {
    DIMENSION_SETS
        .iter()
        .find(|(g, c, _)| *g == gender && *c == category)
        .map(|(_, _, dims)| *dims)
        .unwrap_or(&[])
}

/// Built-in size tables and measurement guides
///
/// Used when no `SIZE_CATALOG_PATH` override is supplied at startup.
pub fn default_catalog() -> SizeCatalog {
    let tables = vec![
        CategoryTable::new(Gender::Men, Category::Tops)
            .with_size(
                SizeEntry::new("XS")
                    .with_dimension("shoulder", 42.5)
                    .with_dimension("chest", 90.0)
                    .with_dimension("waist", 78.0)
                    .with_dimension("neck", 37.0),
            )
            .with_size(
                SizeEntry::new("S")
                    .with_dimension("shoulder", 44.0)
                    .with_dimension("chest", 94.0)
                    .with_dimension("waist", 82.0)
                    .with_dimension("neck", 39.0),
            )
            .with_size(
                SizeEntry::new("M")
                    .with_dimension("shoulder", 45.5)
                    .with_dimension("chest", 98.0)
                    .with_dimension("waist", 86.0)
                    .with_dimension("neck", 41.0),
            )
            .with_size(
                SizeEntry::new("L")
                    .with_dimension("shoulder", 47.0)
                    .with_dimension("chest", 103.0)
                    .with_dimension("waist", 91.0)
                    .with_dimension("neck", 43.0),
            )
            .with_size(
                SizeEntry::new("XL")
                    .with_dimension("shoulder", 49.0)
                    .with_dimension("chest", 109.0)
                    .with_dimension("waist", 97.0)
                    .with_dimension("neck", 45.0),
            )
            .with_size(
                SizeEntry::new("XXL")
                    .with_dimension("shoulder", 51.0)
                    .with_dimension("chest", 115.0)
                    .with_dimension("waist", 103.0)
                    .with_dimension("neck", 46.5),
            ),
        CategoryTable::new(Gender::Men, Category::Trousers)
            .with_size(
                SizeEntry::new("XS")
                    .with_dimension("waist", 72.5)
                    .with_dimension("hips", 88.5)
                    .with_dimension("thigh", 48.0)
                    .with_dimension("inseam", 79.0),
            )
            .with_size(
                SizeEntry::new("S")
                    .with_dimension("waist", 77.5)
                    .with_dimension("hips", 93.5)
                    .with_dimension("thigh", 52.0)
                    .with_dimension("inseam", 81.0),
            )
            .with_size(
                SizeEntry::new("M")
                    .with_dimension("waist", 82.5)
                    .with_dimension("hips", 98.5)
                    .with_dimension("thigh", 56.0)
                    .with_dimension("inseam", 83.0),
            )
            .with_size(
                SizeEntry::new("L")
                    .with_dimension("waist", 87.5)
                    .with_dimension("hips", 103.5)
                    .with_dimension("thigh", 60.0)
                    .with_dimension("inseam", 85.0),
            )
            .with_size(
                SizeEntry::new("XL")
                    .with_dimension("waist", 93.5)
                    .with_dimension("hips", 109.5)
                    .with_dimension("thigh", 64.0)
                    .with_dimension("inseam", 87.0),
            )
            .with_size(
                SizeEntry::new("XXL")
                    .with_dimension("waist", 98.5)
                    .with_dimension("hips", 114.5)
                    .with_dimension("thigh", 66.0)
                    .with_dimension("inseam", 89.0),
            ),
        CategoryTable::new(Gender::Women, Category::Tops)
            .with_size(
                SizeEntry::new("XXS")
                    .with_dimension("shoulder", 35.5)
                    .with_dimension("bust", 77.5)
                    .with_dimension("waist", 60.5)
                    .with_dimension("neck", 33.0),
            )
            .with_size(
                SizeEntry::new("XS")
                    .with_dimension("shoulder", 37.0)
                    .with_dimension("bust", 82.5)
                    .with_dimension("waist", 65.5)
                    .with_dimension("neck", 35.0),
            )
            .with_size(
                SizeEntry::new("S")
                    .with_dimension("shoulder", 38.5)
                    .with_dimension("bust", 87.5)
                    .with_dimension("waist", 70.5)
                    .with_dimension("neck", 37.0),
            )
            .with_size(
                SizeEntry::new("M")
                    .with_dimension("shoulder", 40.0)
                    .with_dimension("bust", 93.0)
                    .with_dimension("waist", 76.0)
                    .with_dimension("neck", 39.0),
            )
            .with_size(
                SizeEntry::new("L")
                    .with_dimension("shoulder", 41.5)
                    .with_dimension("bust", 99.0)
                    .with_dimension("waist", 82.0)
                    .with_dimension("neck", 41.0),
            )
            .with_size(
                SizeEntry::new("XL")
                    .with_dimension("shoulder", 43.0)
                    .with_dimension("bust", 105.0)
                    .with_dimension("waist", 88.0)
                    .with_dimension("neck", 43.0),
            ),
        CategoryTable::new(Gender::Women, Category::Dresses)
            .with_size(
                SizeEntry::new("XXS")
                    .with_dimension("bust", 77.5)
                    .with_dimension("waist", 60.5)
                    .with_dimension("hips", 86.5)
                    .with_dimension("length", 92.5),
            )
            .with_size(
                SizeEntry::new("XS")
                    .with_dimension("bust", 82.5)
                    .with_dimension("waist", 65.5)
                    .with_dimension("hips", 91.5)
                    .with_dimension("length", 97.5),
            )
            .with_size(
                SizeEntry::new("S")
                    .with_dimension("bust", 87.5)
                    .with_dimension("waist", 70.5)
                    .with_dimension("hips", 96.5)
                    .with_dimension("length", 102.5),
            )
            .with_size(
                SizeEntry::new("M")
                    .with_dimension("bust", 93.0)
                    .with_dimension("waist", 76.0)
                    .with_dimension("hips", 102.0)
                    .with_dimension("length", 107.5),
            )
            .with_size(
                SizeEntry::new("L")
                    .with_dimension("bust", 99.0)
                    .with_dimension("waist", 82.0)
                    .with_dimension("hips", 108.0)
                    .with_dimension("length", 112.5),
            )
            .with_size(
                SizeEntry::new("XL")
                    .with_dimension("bust", 105.0)
                    .with_dimension("waist", 88.0)
                    .with_dimension("hips", 114.0)
                    .with_dimension("length", 117.5),
            ),
        CategoryTable::new(Gender::Women, Category::Trousers)
            .with_size(
                SizeEntry::new("XXS")
                    .with_dimension("waist", 61.5)
                    .with_dimension("hips", 87.5)
                    .with_dimension("thigh", 50.5)
                    .with_dimension("inseam", 76.0),
            )
            .with_size(
                SizeEntry::new("XS")
                    .with_dimension("waist", 64.0)
                    .with_dimension("hips", 90.0)
                    .with_dimension("thigh", 51.5)
                    .with_dimension("inseam", 78.0),
            )
            .with_size(
                SizeEntry::new("S")
                    .with_dimension("waist", 66.5)
                    .with_dimension("hips", 92.5)
                    .with_dimension("thigh", 52.5)
                    .with_dimension("inseam", 80.0),
            )
            .with_size(
                SizeEntry::new("M")
                    .with_dimension("waist", 69.0)
                    .with_dimension("hips", 95.0)
                    .with_dimension("thigh", 53.5)
                    .with_dimension("inseam", 82.0),
            )
            .with_size(
                SizeEntry::new("L")
                    .with_dimension("waist", 71.5)
                    .with_dimension("hips", 97.5)
                    .with_dimension("thigh", 54.5)
                    .with_dimension("inseam", 84.0),
            )
            .with_size(
                SizeEntry::new("XL")
                    .with_dimension("waist", 74.0)
                    .with_dimension("hips", 100.0)
                    .with_dimension("thigh", 55.5)
                    .with_dimension("inseam", 86.0),
            ),
    ];

    let mut guides = HashMap::new();
    guides.insert(
        "shoulder".to_string(),
        MeasurementGuide {
            title: "Shoulder Width".to_string(),
            description: "Measure across your back from shoulder bone to shoulder bone".to_string(),
        },
    );
    guides.insert(
        "chest".to_string(),
        MeasurementGuide {
            title: "Chest".to_string(),
            description: "Measure around the fullest part of your chest, under your arms".to_string(),
        },
    );
    guides.insert(
        "bust".to_string(),
        MeasurementGuide {
            title: "Bust".to_string(),
            description: "Measure around the fullest part of your bust".to_string(),
        },
    );
    guides.insert(
        "waist".to_string(),
        MeasurementGuide {
            title: "Waist".to_string(),
            description: "Measure around your natural waistline".to_string(),
        },
    );
    guides.insert(
        "neck".to_string(),
        MeasurementGuide {
            title: "Neck".to_string(),
            description: "Measure around the base of your neck".to_string(),
        },
    );
    guides.insert(
        "hips".to_string(),
        MeasurementGuide {
            title: "Hips".to_string(),
            description: "Measure around the fullest part of your hips".to_string(),
        },
    );
    guides.insert(
        "thigh".to_string(),
        MeasurementGuide {
            title: "Thigh".to_string(),
            description: "Measure around the fullest part of your thigh".to_string(),
        },
    );
    guides.insert(
        "inseam".to_string(),
        MeasurementGuide {
            title: "Inseam".to_string(),
            description: "Measure from your crotch to the bottom of your ankle".to_string(),
        },
    );
    guides.insert(
        "length".to_string(),
        MeasurementGuide {
            title: "Length".to_string(),
            description: "Measure from the shoulder to the desired hemline".to_string(),
        },
    );

    SizeCatalog {
        chart: SizeChart { tables },
        guides,
    }
}
