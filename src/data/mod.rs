//! Data layer: core types, loading, indicators and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  loader   │  parse file → Vec<Record>
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize │  Yes/No → 1/0, Revenue / Visitors
//!   └───────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ indicators │  CPS per (Country, Category), TDI per Country, joins
//!   └────────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  filter   │  Country/Category selection → row indices
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  summary  │  overview, CPS histogram/pivot, TDI per country
//!   └───────────┘
//! ```

use std::path::Path;

use anyhow::Result;

use crate::config::PipelineConfig;

pub mod cache;
pub mod error;
pub mod filter;
pub mod indicators;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

use model::TourismTable;

/// Run the whole pipeline once: read, normalize, derive indicators.
pub fn load_and_process(path: &Path, config: &PipelineConfig) -> Result<TourismTable> {
    let records = loader::load_file(path)?;
    let derived = normalize::normalize(records, config)?;
    Ok(indicators::build_table(derived))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn pipeline_matches_in_memory_fixture() {
        let file = csv_file(testing::SAMPLE_CSV);
        let table = load_and_process(file.path(), &PipelineConfig::default()).unwrap();
        let expected = testing::sample_table();

        assert!(!table.is_empty());
        assert_eq!(table.len(), expected.len());
        assert_eq!(table.cps_table, expected.cps_table);
        assert_eq!(table.tdi_table, expected.tdi_table);
        assert_eq!(table.extra_columns, vec!["Location"]);
        for (a, b) in table.rows.iter().zip(&expected.rows) {
            assert_eq!(a.cps, b.cps);
            assert_eq!(a.tdi, b.tdi);
        }
    }

    #[test]
    fn pipeline_is_idempotent_on_the_same_file() {
        let file = csv_file(testing::SAMPLE_CSV);
        let first = load_and_process(file.path(), &PipelineConfig::default()).unwrap();
        let second = load_and_process(file.path(), &PipelineConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn strict_policy_surfaces_unrecognized_value() {
        let file = csv_file(
            "Country,Category,Visitors,Revenue,Rating,Accommodation_Available\n\
             US,Beach,10,100,4.0,Unknown\n",
        );
        let err = load_and_process(file.path(), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnrecognizedCategoricalValue { row: 0, .. })
        ));

        let table = load_and_process(file.path(), &PipelineConfig::lenient()).unwrap();
        let group = &table.cps_table[0];
        assert_eq!(group.means[2], None);
        assert_eq!(table.rows[0].tdi, Some(0.0));
    }

    #[test]
    fn non_finite_rating_fails_instead_of_poisoning_cps() {
        let file = csv_file(
            "Country,Category,Visitors,Revenue,Rating,Accommodation_Available\n\
             US,Beach,10,100,NaN,Yes\n\
             US,Urban,10,200,4.0,No\n\
             FR,Beach,10,300,2.0,Yes\n",
        );
        let err = load_and_process(file.path(), &PipelineConfig::lenient()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidNumber { row: 0, column, .. }) if column == "Rating"
        ));
    }
}
