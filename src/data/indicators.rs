use std::collections::BTreeMap;

use super::model::{
    CpsRow, DerivedRecord, GroupKey, OutputRow, TdiRow, TourismTable, ACCOMMODATION, RATING,
    REVENUE_PER_VISITOR,
};

// ---------------------------------------------------------------------------
// Indicator columns
// ---------------------------------------------------------------------------

/// The three per-row fields that feed the Category Potential Score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColumn {
    RevenuePerVisitor,
    Rating,
    AccommodationAvailable,
}

impl IndicatorColumn {
    /// Column order used by [`CpsRow::means`] and [`CpsRow::normalized`].
    pub const CPS_COLUMNS: [IndicatorColumn; 3] = [
        IndicatorColumn::RevenuePerVisitor,
        IndicatorColumn::Rating,
        IndicatorColumn::AccommodationAvailable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndicatorColumn::RevenuePerVisitor => REVENUE_PER_VISITOR,
            IndicatorColumn::Rating => RATING,
            IndicatorColumn::AccommodationAvailable => ACCOMMODATION,
        }
    }

    fn value(self, row: &DerivedRecord) -> Option<f64> {
        match self {
            IndicatorColumn::RevenuePerVisitor => row.revenue_per_visitor,
            IndicatorColumn::Rating => Some(row.record.rating),
            IndicatorColumn::AccommodationAvailable => row.accommodation_numeric(),
        }
    }
}

// ---------------------------------------------------------------------------
// Min-max scaling
// ---------------------------------------------------------------------------

/// Rescale the present values of a column to [0, 1] using the observed
/// minimum and maximum. Missing values stay missing.
///
/// A column with no variance (min == max) carries no signal and maps every
/// present value to 0.0.
pub fn min_max_scale(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut present = values.iter().flatten().copied().peekable();
    if present.peek().is_none() {
        return vec![None; values.len()];
    }

    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;

    values
        .iter()
        .map(|v| {
            v.map(|v| {
                if range == 0.0 {
                    0.0
                } else {
                    (v - min) / range
                }
            })
        })
        .collect()
}

/// Arithmetic mean of the present values, `None` if there are none.
fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

// ---------------------------------------------------------------------------
// CPS: Category Potential Score per (Country, Category)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MeanAccumulator {
    sums: [f64; 3],
    counts: [usize; 3],
}

impl MeanAccumulator {
    fn push(&mut self, row: &DerivedRecord) {
        for (i, column) in IndicatorColumn::CPS_COLUMNS.iter().enumerate() {
            if let Some(v) = column.value(row) {
                self.sums[i] += v;
                self.counts[i] += 1;
            }
        }
    }

    fn means(&self) -> [Option<f64>; 3] {
        std::array::from_fn(|i| (self.counts[i] > 0).then(|| self.sums[i] / self.counts[i] as f64))
    }
}

/// Group means of the three CPS columns, keyed and sorted by (Country, Category).
pub fn group_means(rows: &[DerivedRecord]) -> BTreeMap<GroupKey, [Option<f64>; 3]> {
    let mut groups: BTreeMap<GroupKey, MeanAccumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(row.group_key()).or_default().push(row);
    }
    groups
        .into_iter()
        .map(|(key, acc)| (key, acc.means()))
        .collect()
}

/// Build the CPS table: group means, min-max scaled across groups column by
/// column, averaged into a single score.
pub fn cps_table(rows: &[DerivedRecord]) -> Vec<CpsRow> {
    let (keys, means): (Vec<GroupKey>, Vec<[Option<f64>; 3]>) =
        group_means(rows).into_iter().unzip();

    let mut normalized = vec![[None; 3]; keys.len()];
    for (i, name) in IndicatorColumn::CPS_COLUMNS.iter().map(|c| c.name()).enumerate() {
        let column: Vec<Option<f64>> = means.iter().map(|m| m[i]).collect();
        let missing = column.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            log::debug!("{missing} groups have no {name} values");
        }
        for (slot, scaled) in normalized.iter_mut().zip(min_max_scale(&column)) {
            slot[i] = scaled;
        }
    }

    keys.into_iter()
        .zip(means)
        .zip(normalized)
        .map(|((key, means), normalized)| CpsRow {
            key,
            means,
            normalized,
            cps: mean_present(&normalized),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TDI: Tourism Diversity Index per Country
// ---------------------------------------------------------------------------

/// Simpson diversity `1 - Σ p²` over a set of category counts.
pub fn simpson_index<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts: Vec<usize> = counts.into_iter().collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let concentration: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - concentration
}

/// Build the TDI table from each country's category distribution.
pub fn tdi_table(rows: &[DerivedRecord]) -> Vec<TdiRow> {
    let mut distribution: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for row in rows {
        *distribution
            .entry(row.record.country.as_str())
            .or_default()
            .entry(row.record.category.as_str())
            .or_default() += 1;
    }

    distribution
        .into_iter()
        .map(|(country, categories)| TdiRow {
            country: country.to_string(),
            tdi: simpson_index(categories.into_values()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Compute both indicator tables and left-join them onto every row.
pub fn build_table(rows: Vec<DerivedRecord>) -> TourismTable {
    let cps = cps_table(&rows);
    let tdi = tdi_table(&rows);

    let cps_lookup: BTreeMap<(&str, &str), Option<f64>> = cps
        .iter()
        .map(|r| ((r.key.country.as_str(), r.key.category.as_str()), r.cps))
        .collect();
    let tdi_lookup: BTreeMap<&str, f64> = tdi
        .iter()
        .map(|r| (r.country.as_str(), r.tdi))
        .collect();

    let joined: Vec<OutputRow> = rows
        .into_iter()
        .map(|derived| {
            let country = derived.record.country.as_str();
            let category = derived.record.category.as_str();
            let cps = cps_lookup.get(&(country, category)).copied().flatten();
            let tdi = tdi_lookup.get(country).copied();
            OutputRow { derived, cps, tdi }
        })
        .collect();

    log::info!(
        "computed indicators: {} rows, {} country/category groups, {} countries",
        joined.len(),
        cps.len(),
        tdi.len()
    );

    TourismTable::from_parts(joined, cps, tdi)
}
