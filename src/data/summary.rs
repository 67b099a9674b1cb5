use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::DataError;
use super::model::{TdiRow, TourismTable};

/// Bin count of the CPS distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Overview statistics
// ---------------------------------------------------------------------------

/// Record count and means over the selected rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    pub records: usize,
    /// `None` when no rows are selected.
    pub mean_revenue: Option<f64>,
    pub mean_rating: Option<f64>,
}

/// Summarise the rows at `indices`. Never fails; empty input yields `None` means.
pub fn overview(table: &TourismTable, indices: &[usize]) -> Overview {
    let mut revenue = 0.0;
    let mut rating = 0.0;
    for &i in indices {
        let record = &table.rows[i].derived.record;
        revenue += record.revenue;
        rating += record.rating;
    }
    let n = indices.len();
    Overview {
        records: n,
        mean_revenue: (n > 0).then(|| revenue / n as f64),
        mean_rating: (n > 0).then(|| rating / n as f64),
    }
}

/// Two decimals, or `N/A` for a missing value.
pub struct Rounded(pub Option<f64>);

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.2}"),
            None => write!(f, "N/A"),
        }
    }
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Records: {}", self.records)?;
        writeln!(f, "Average Revenue: {}", Rounded(self.mean_revenue))?;
        write!(f, "Average Rating: {}", Rounded(self.mean_rating))
    }
}

// ---------------------------------------------------------------------------
// CPS distribution
// ---------------------------------------------------------------------------

/// Equal-width histogram of CPS values.
#[derive(Debug, Clone, PartialEq)]
pub struct CpsHistogram {
    /// `counts.len() + 1` edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin the present CPS values of the selected rows into `bins` equal-width
/// bins spanning their min and max. The last bin is closed on the right.
pub fn cps_histogram(
    table: &TourismTable,
    indices: &[usize],
    bins: usize,
) -> Result<CpsHistogram, DataError> {
    let values: Vec<f64> = indices.iter().filter_map(|&i| table.rows[i].cps).collect();
    if values.is_empty() || bins == 0 {
        return Err(DataError::EmptySelection);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let edges = (0..=bins).map(|b| min + width * b as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        let bin = if width > 0.0 {
            (((v - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }

    Ok(CpsHistogram { edges, counts })
}

// ---------------------------------------------------------------------------
// CPS pivot: Country × Category
// ---------------------------------------------------------------------------

/// Mean CPS per (Country, Category) over the selected rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CpsPivot {
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub cells: BTreeMap<(String, String), f64>,
}

impl CpsPivot {
    /// Missing when the pair has no selected rows with a CPS.
    pub fn get(&self, country: &str, category: &str) -> Option<f64> {
        self.cells
            .get(&(country.to_string(), category.to_string()))
            .copied()
    }
}

pub fn cps_pivot(table: &TourismTable, indices: &[usize]) -> Result<CpsPivot, DataError> {
    if indices.is_empty() {
        return Err(DataError::EmptySelection);
    }

    let mut sums: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    let mut countries = BTreeSet::new();
    let mut categories = BTreeSet::new();

    for &i in indices {
        let row = &table.rows[i];
        let Some(cps) = row.cps else {
            continue;
        };
        countries.insert(row.country().to_string());
        categories.insert(row.category().to_string());
        let entry = sums
            .entry((row.country().to_string(), row.category().to_string()))
            .or_insert((0.0, 0));
        entry.0 += cps;
        entry.1 += 1;
    }

    Ok(CpsPivot {
        countries: countries.into_iter().collect(),
        categories: categories.into_iter().collect(),
        cells: sums
            .into_iter()
            .map(|(key, (sum, n))| (key, sum / n as f64))
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// TDI per country
// ---------------------------------------------------------------------------

/// Distinct (Country, TDI) pairs over the whole table, ignoring any selection.
pub fn tdi_by_country(table: &TourismTable) -> &[TdiRow] {
    &table.tdi_table
}
