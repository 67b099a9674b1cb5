//! Shared fixtures for the data-layer tests.

use std::collections::BTreeMap;

use super::indicators::build_table;
use super::model::{CellValue, Record, TourismTable};
use super::normalize::normalize;
use crate::config::PipelineConfig;

pub const SAMPLE_CSV: &str = "\
Location,Country,Category,Visitors,Rating,Revenue,Accommodation_Available
Miami,US,Beach,100,4.0,5000,Yes
Malibu,US,Beach,50,3.0,3000,No
New York,US,Urban,10,5.0,200,Yes
Paris,France,Cultural,20,2.0,1000,No
Nice,France,Beach,40,4.5,4000,Yes
Kyoto,Japan,Cultural,30,3.5,900,Yes
";

pub fn record(
    country: &str,
    category: &str,
    visitors: f64,
    revenue: f64,
    rating: f64,
    accommodation: &str,
) -> Record {
    Record {
        country: country.into(),
        category: category.into(),
        visitors,
        revenue,
        rating,
        accommodation: CellValue::String(accommodation.into()),
        extra: BTreeMap::new(),
    }
}

/// Same rows as [`SAMPLE_CSV`], built in memory.
pub fn sample_records() -> Vec<Record> {
    vec![
        record("US", "Beach", 100.0, 5000.0, 4.0, "Yes"),
        record("US", "Beach", 50.0, 3000.0, 3.0, "No"),
        record("US", "Urban", 10.0, 200.0, 5.0, "Yes"),
        record("France", "Cultural", 20.0, 1000.0, 2.0, "No"),
        record("France", "Beach", 40.0, 4000.0, 4.5, "Yes"),
        record("Japan", "Cultural", 30.0, 900.0, 3.5, "Yes"),
    ]
}

pub fn sample_table() -> TourismTable {
    let derived =
        normalize(sample_records(), &PipelineConfig::default()).expect("sample normalizes");
    build_table(derived)
}
