use std::collections::BTreeSet;

use super::model::TourismTable;

// ---------------------------------------------------------------------------
// Selection predicate: which countries and categories are shown
// ---------------------------------------------------------------------------

/// Selected values for the two filterable columns.
///
/// A row passes when its country is in `countries` AND its category is in
/// `categories`. An empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl Selection {
    pub fn new<C, K>(countries: C, categories: K) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a (country, category) pair passes the selection.
    pub fn matches(&self, country: &str, category: &str) -> bool {
        self.countries.contains(country) && self.categories.contains(category)
    }
}

/// Initialise a [`Selection`] with every value selected (i.e., show everything).
pub fn init_selection(table: &TourismTable) -> Selection {
    Selection {
        countries: table.countries.clone(),
        categories: table.categories.clone(),
    }
}

/// Return indices of rows that pass the selection, in table order.
pub fn filtered_indices(table: &TourismTable, selection: &Selection) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| selection.matches(row.country(), row.category()))
        .map(|(i, _)| i)
        .collect()
}
