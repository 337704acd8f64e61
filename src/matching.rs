//! # Size Matching
//!
//! Scores a shopper's measurements against a size table and picks the
//! closest entry.
//!
//! ## How scoring works
//!
//! Measurements are kept as the raw strings the shopper typed and only
//! parsed here, at match time. For every size entry the matcher averages
//! the absolute difference over the dimensions that are both supplied
//! (and parseable) and present on the entry; the entry with the lowest
//! average wins. Comparison is strictly `<`, so on a tie the entry earlier
//! in the chart keeps its spot.
//!
//! All chart values are centimeters. Inch input is converted per value at
//! match time; switching units never rewrites what the shopper typed.

use crate::catalog::{Category, Gender, SizeChart, SizeEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Dimension name → raw value string, exactly as the shopper typed it
pub type UserMeasurements = HashMap<String, String>;

/// Centimeters per inch
pub const INCH_TO_CM: f64 = 2.54;

/// Label stored when no size entry could be scored against the input
pub const SIZE_NOT_FOUND: &str = "Size not found";

/// Unit the shopper is entering measurements in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    #[default]
    Cm,
    Inch,
}

impl MeasurementUnit {
    /// Lowercase name as it appears in callbacks, JSON and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::Cm => "cm",
            MeasurementUnit::Inch => "inch",
        }
    }

    /// Convert a value in this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            MeasurementUnit::Cm => value,
            MeasurementUnit::Inch => value * INCH_TO_CM,
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse one raw measurement string into a number
///
/// Accepts a decimal comma ("56,5") as well as a decimal point, trims
/// surrounding whitespace, and insists the whole string is a number:
/// "76 cm" is rejected, not salvaged.
///
/// # Examples
///
/// ```rust
/// use size_finder::matching::parse_raw_value;
///
/// assert_eq!(parse_raw_value(" 76 "), Some(76.0));
/// assert_eq!(parse_raw_value("56,5"), Some(56.5));
/// assert_eq!(parse_raw_value("76 cm"), None);
/// assert_eq!(parse_raw_value(""), None);
/// ```
pub fn parse_raw_value(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Recommend a size label for the given measurements
///
/// Returns `None` when nothing could be scored: the chart has no table for
/// the pair, no supplied value parses, or no parsed dimension overlaps any
/// entry. Callers surface that as [`SIZE_NOT_FOUND`].
///
/// # Arguments
///
/// * `chart` - The reference size chart
/// * `gender` / `category` - The table to score against
/// * `measurements` - Raw dimension values as typed by the shopper
/// * `unit` - Unit the raw values are in
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use size_finder::catalog::{default_catalog, Category, Gender};
/// use size_finder::matching::{recommend, MeasurementUnit};
///
/// let catalog = default_catalog();
/// let mut measurements = HashMap::new();
/// measurements.insert("bust".to_string(), "93".to_string());
/// measurements.insert("waist".to_string(), "76".to_string());
/// measurements.insert("hips".to_string(), "102".to_string());
///
/// let size = recommend(
///     &catalog.chart,
///     Gender::Women,
///     Category::Dresses,
///     &measurements,
///     MeasurementUnit::Cm,
/// );
/// assert_eq!(size.as_deref(), Some("M"));
/// ```
pub fn recommend(
    chart: &SizeChart,
    gender: Gender,
    category: Category,
    measurements: &UserMeasurements,
    unit: MeasurementUnit,
) -> Option<String> {
    let table = chart.table(gender, category)?;

    let supplied: HashMap<&str, f64> = measurements
        .iter()
        .filter_map(|(name, raw)| parse_raw_value(raw).map(|v| (name.as_str(), unit.to_cm(v))))
        .collect();

    if supplied.is_empty() {
        trace!(gender = %gender, category = %category, "No parseable measurements supplied");
        return None;
    }

    let mut best: Option<(&SizeEntry, f64)> = None;
    for entry in &table.sizes {
        let mut total = 0.0;
        let mut counted = 0usize;
        for (name, value_cm) in &supplied {
            if let Some(ideal) = entry.dimensions.get(*name) {
                total += (value_cm - ideal).abs();
                counted += 1;
            }
        }
        if counted == 0 {
            continue;
        }

        let score = total / counted as f64;
        trace!(label = %entry.label, score = score, dimensions = counted, "Scored size entry");
        match best {
            Some((_, best_score)) if score < best_score => best = Some((entry, score)),
            None => best = Some((entry, score)),
            _ => {}
        }
    }

    best.map(|(entry, _)| entry.label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_catalog, CategoryTable};

    fn single_dimension_chart() -> SizeChart {
        SizeChart {
            tables: vec![CategoryTable::new(Gender::Men, Category::Tops)
                .with_size(SizeEntry::new("A").with_dimension("chest", 90.0))
                .with_size(SizeEntry::new("B").with_dimension("chest", 100.0))],
        }
    }

    fn measurements(pairs: &[(&str, &str)]) -> UserMeasurements {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_raw_value_variants() {
        assert_eq!(parse_raw_value("76"), Some(76.0));
        assert_eq!(parse_raw_value("  93.5 "), Some(93.5));
        assert_eq!(parse_raw_value("56,5"), Some(56.5));
        assert_eq!(parse_raw_value("abc"), None);
        assert_eq!(parse_raw_value("76 cm"), None);
        assert_eq!(parse_raw_value(""), None);
        assert_eq!(parse_raw_value("   "), None);
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(MeasurementUnit::Cm.to_cm(76.0), 76.0);
        assert_eq!(MeasurementUnit::Inch.to_cm(10.0), 25.4);
    }

    #[test]
    fn test_exact_match_wins() {
        let catalog = default_catalog();
        let m = measurements(&[("bust", "93"), ("waist", "76"), ("hips", "102")]);

        let size = recommend(
            &catalog.chart,
            Gender::Women,
            Category::Dresses,
            &m,
            MeasurementUnit::Cm,
        );
        assert_eq!(size.as_deref(), Some("M"));
    }

    #[test]
    fn test_missing_table_returns_none() {
        let catalog = default_catalog();
        let m = measurements(&[("waist", "76")]);

        let size = recommend(
            &catalog.chart,
            Gender::Men,
            Category::Dresses,
            &m,
            MeasurementUnit::Cm,
        );
        assert_eq!(size, None);
    }

    #[test]
    fn test_unparseable_values_are_skipped() {
        let chart = single_dimension_chart();
        let m = measurements(&[("chest", "about ninety")]);

        let size = recommend(&chart, Gender::Men, Category::Tops, &m, MeasurementUnit::Cm);
        assert_eq!(size, None);
    }

    #[test]
    fn test_no_overlapping_dimensions_returns_none() {
        let chart = single_dimension_chart();
        let m = measurements(&[("inseam", "80")]);

        let size = recommend(&chart, Gender::Men, Category::Tops, &m, MeasurementUnit::Cm);
        assert_eq!(size, None);
    }

    #[test]
    fn test_tie_keeps_earlier_entry() {
        // 95 is equidistant from A (90) and B (100); strict comparison
        // keeps the earlier entry.
        let chart = single_dimension_chart();
        let m = measurements(&[("chest", "95")]);

        let size = recommend(&chart, Gender::Men, Category::Tops, &m, MeasurementUnit::Cm);
        assert_eq!(size.as_deref(), Some("A"));
    }

    #[test]
    fn test_inch_input_converts_per_value() {
        let chart = single_dimension_chart();
        // 39.37 in ≈ 100 cm, closest to B.
        let m = measurements(&[("chest", "39.37")]);

        let size = recommend(&chart, Gender::Men, Category::Tops, &m, MeasurementUnit::Inch);
        assert_eq!(size.as_deref(), Some("B"));
    }

    #[test]
    fn test_unit_serde_names() {
        assert_eq!(serde_json::to_string(&MeasurementUnit::Inch).unwrap(), "\"inch\"");
        let unit: MeasurementUnit = serde_json::from_str("\"cm\"").unwrap();
        assert_eq!(unit, MeasurementUnit::Cm);
    }
}
