// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// What to do with an `Accommodation_Available` value other than `Yes`/`No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccommodationPolicy {
    /// Reject the load with `UnrecognizedCategoricalValue`.
    #[default]
    Strict,
    /// Keep the row with a missing value; it is skipped by group means.
    TreatAsMissing,
}

/// What to do with `Revenue / Visitors` when `Visitors` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroVisitorsPolicy {
    /// Revenue per visitor becomes missing and is skipped by group means.
    #[default]
    Missing,
    /// Reject the load with `DivisionUndefined`.
    Fail,
}

/// Knobs for the normalization step. Indicators themselves have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    pub accommodation: AccommodationPolicy,
    pub zero_visitors: ZeroVisitorsPolicy,
}

impl PipelineConfig {
    /// The lenient variant: both policies pass bad values through as missing.
    pub fn lenient() -> Self {
        Self {
            accommodation: AccommodationPolicy::TreatAsMissing,
            zero_visitors: ZeroVisitorsPolicy::Missing,
        }
    }
}
