use std::sync::Arc;

use crate::data::error::DataError;
use crate::data::filter::{filtered_indices, init_selection, Selection};
use crate::data::model::TourismTable;
use crate::data::summary::{self, CpsHistogram, CpsPivot, Overview, DEFAULT_HISTOGRAM_BINS};

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The presentation state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a dataset is loaded).
    pub table: Option<Arc<TourismTable>>,

    /// Current Country/Category selection.
    pub selection: Selection,

    /// Indices of rows passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Status / error message shown to the user.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            selection: Selection::default(),
            visible_indices: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table and select everything.
    pub fn set_table(&mut self, table: Arc<TourismTable>) {
        self.selection = init_selection(&table);
        self.visible_indices = (0..table.len()).collect();
        self.table = Some(table);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.selection);
        }
    }

    /// Replace the whole selection.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.refilter();
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selection.countries.remove(country) {
            self.selection.countries.insert(country.to_string());
        }
        self.refilter();
    }

    /// Toggle a single category in the selection.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.selection.categories.remove(category) {
            self.selection.categories.insert(category.to_string());
        }
        self.refilter();
    }

    /// Select every country and category.
    pub fn select_all(&mut self) {
        if let Some(table) = &self.table {
            self.selection = init_selection(table);
            self.refilter();
        }
    }

    /// Deselect everything.
    pub fn select_none(&mut self) {
        self.selection = Selection::default();
        self.refilter();
    }

    /// Overview statistics over the visible rows; `None` before a load.
    pub fn overview(&self) -> Option<Overview> {
        let table = self.table.as_ref()?;
        Some(summary::overview(table, &self.visible_indices))
    }

    /// CPS distribution over the visible rows.
    pub fn cps_histogram(&self) -> Result<CpsHistogram, DataError> {
        let table = self.table.as_ref().ok_or(DataError::EmptySelection)?;
        summary::cps_histogram(table, &self.visible_indices, DEFAULT_HISTOGRAM_BINS)
    }

    /// Country × Category CPS means over the visible rows.
    pub fn cps_pivot(&self) -> Result<CpsPivot, DataError> {
        let table = self.table.as_ref().ok_or(DataError::EmptySelection)?;
        summary::cps_pivot(table, &self.visible_indices)
    }
}
