use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COUNTRY: &str = "Country";
pub const CATEGORY: &str = "Category";
pub const VISITORS: &str = "Visitors";
pub const REVENUE: &str = "Revenue";
pub const RATING: &str = "Rating";
pub const ACCOMMODATION: &str = "Accommodation_Available";
pub const REVENUE_PER_VISITOR: &str = "Revenue_per_visitor";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 6] =
    [COUNTRY, CATEGORY, VISITORS, REVENUE, RATING, ACCOMMODATION];

// ---------------------------------------------------------------------------
// CellValue – a single cell in a pass-through column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell for columns outside the required set, and for the
/// raw `Accommodation_Available` value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as an `f64` when it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the raw table
// ---------------------------------------------------------------------------

/// One row exactly as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub category: String,
    pub visitors: f64,
    pub revenue: f64,
    pub rating: f64,
    /// Raw `Accommodation_Available` cell, `"Yes"`/`"No"` in well-formed input.
    pub accommodation: CellValue,
    /// Every other column: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

/// A [`Record`] after coercion and the revenue-per-visitor ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub record: Record,
    /// `Some(true)` for "Yes", `Some(false)` for "No", `None` when unrecognized
    /// and the lenient policy is active.
    pub accommodation_available: Option<bool>,
    /// `None` when `Visitors` is zero and the missing-value policy is active.
    pub revenue_per_visitor: Option<f64>,
}

impl DerivedRecord {
    /// Accommodation as the 1/0 numeric column the indicators average over.
    pub fn accommodation_numeric(&self) -> Option<f64> {
        self.accommodation_available
            .map(|available| if available { 1.0 } else { 0.0 })
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            country: self.record.country.clone(),
            category: self.record.category.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator tables
// ---------------------------------------------------------------------------

/// (Country, Category) pair that CPS is aggregated over.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub country: String,
    pub category: String,
}

/// One row of the CPS table.
#[derive(Debug, Clone, PartialEq)]
pub struct CpsRow {
    pub key: GroupKey,
    /// Group means of revenue per visitor, rating and accommodation.
    pub means: [Option<f64>; 3],
    /// The same three columns after min-max scaling across all groups.
    pub normalized: [Option<f64>; 3],
    pub cps: Option<f64>,
}

/// One row of the TDI table.
#[derive(Debug, Clone, PartialEq)]
pub struct TdiRow {
    pub country: String,
    pub tdi: f64,
}

// ---------------------------------------------------------------------------
// Output table
// ---------------------------------------------------------------------------

/// A derived record with both indicators joined on.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub derived: DerivedRecord,
    pub cps: Option<f64>,
    pub tdi: Option<f64>,
}

impl OutputRow {
    pub fn country(&self) -> &str {
        &self.derived.record.country
    }

    pub fn category(&self) -> &str {
        &self.derived.record.category
    }
}

/// The complete derived dataset handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TourismTable {
    /// All rows, in input order.
    pub rows: Vec<OutputRow>,
    /// One row per (Country, Category), sorted by key.
    pub cps_table: Vec<CpsRow>,
    /// One row per Country, sorted by country.
    pub tdi_table: Vec<TdiRow>,
    /// Pass-through column names seen in the input, sorted.
    pub extra_columns: Vec<String>,
    /// Sorted unique values of the two filterable columns.
    pub countries: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl TourismTable {
    /// Build the column indices from the joined rows.
    pub fn from_parts(
        rows: Vec<OutputRow>,
        cps_table: Vec<CpsRow>,
        tdi_table: Vec<TdiRow>,
    ) -> Self {
        let mut extra_columns: BTreeSet<String> = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for row in &rows {
            countries.insert(row.country().to_string());
            categories.insert(row.category().to_string());
            extra_columns.extend(row.derived.record.extra.keys().cloned());
        }

        TourismTable {
            rows,
            cps_table,
            tdi_table,
            extra_columns: extra_columns.into_iter().collect(),
            countries,
            categories,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
