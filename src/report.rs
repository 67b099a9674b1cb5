use std::fmt::Write;
use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::error::DataError;
use crate::data::model::TdiRow;
use crate::data::summary::{tdi_by_country, CpsHistogram, CpsPivot};
use crate::state::AppState;

/// Width of the longest histogram bar.
const BAR_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Text dashboard
// ---------------------------------------------------------------------------

/// Render the four dashboard sections for the current state.
pub fn render(state: &AppState) -> Result<String> {
    let mut out = String::new();

    let Some(table) = &state.table else {
        writeln!(out, "No dataset loaded.")?;
        return Ok(out);
    };

    writeln!(out, "Tourism Insights")?;
    writeln!(out)?;

    writeln!(out, "1. Overview Statistics")?;
    if let Some(overview) = state.overview() {
        writeln!(out, "{overview}")?;
    }
    writeln!(out)?;

    match state.cps_histogram() {
        Ok(hist) => {
            writeln!(out, "2. Distribution of Category Potential Score (CPS)")?;
            out.push_str(&histogram_text(&hist)?);
        }
        Err(DataError::EmptySelection) => {
            writeln!(out, "CPS data not available for current filter selection.")?;
        }
        Err(e) => return Err(e.into()),
    }
    writeln!(out)?;

    match state.cps_pivot() {
        Ok(pivot) => {
            writeln!(out, "3. CPS by Country and Category")?;
            writeln!(out, "{}", pretty_format_batches(&[pivot_batch(&pivot)?])?)?;
            writeln!(out)?;
        }
        Err(DataError::EmptySelection) => {}
        Err(e) => return Err(e.into()),
    }

    writeln!(out, "4. Tourism Diversity Index (TDI) by Country")?;
    writeln!(out, "{}", pretty_format_batches(&[tdi_batch(tdi_by_country(table))?])?)?;

    Ok(out)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// One line per bin: `[lo, hi) count ####`.
fn histogram_text(hist: &CpsHistogram) -> Result<String, std::fmt::Error> {
    let peak = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    let mut out = String::new();
    for (i, &count) in hist.counts.iter().enumerate() {
        let bar = "#".repeat(count * BAR_WIDTH / peak);
        writeln!(
            out,
            "  [{:.3}, {:.3}) {count:>5} {bar}",
            hist.edges[i],
            hist.edges[i + 1]
        )?;
    }
    Ok(out)
}

fn pivot_batch(pivot: &CpsPivot) -> Result<RecordBatch> {
    let mut columns: Vec<(String, ArrayRef)> = Vec::with_capacity(pivot.categories.len() + 1);
    columns.push((
        "Country".to_string(),
        Arc::new(StringArray::from(pivot.countries.clone())) as ArrayRef,
    ));
    for category in &pivot.categories {
        let cells: Float64Array = pivot
            .countries
            .iter()
            .map(|country| pivot.get(country, category).map(round2))
            .collect();
        columns.push((category.clone(), Arc::new(cells) as ArrayRef));
    }
    Ok(RecordBatch::try_from_iter(columns)?)
}

fn tdi_batch(rows: &[TdiRow]) -> Result<RecordBatch> {
    let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let tdi: Vec<f64> = rows.iter().map(|r| round2(r.tdi)).collect();
    Ok(RecordBatch::try_from_iter(vec![
        ("Country", Arc::new(StringArray::from(countries)) as ArrayRef),
        ("TDI", Arc::new(Float64Array::from(tdi)) as ArrayRef),
    ])?)
}
