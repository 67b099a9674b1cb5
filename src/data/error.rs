use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the load → normalize → indicators pipeline
// ---------------------------------------------------------------------------

/// Typed failures raised while loading or deriving the tourism table.
///
/// Loader entry points return `anyhow::Result`; these variants travel inside
/// it and can be recovered with `downcast_ref::<DataError>()`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("row {row}: unrecognized value '{value}' in column '{column}'")]
    UnrecognizedCategoricalValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: column '{column}' value '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: revenue per visitor is undefined (Visitors = 0)")]
    DivisionUndefined { row: usize },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("no rows match the current selection")]
    EmptySelection,
}
