use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("sequencing summary parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(
        "column {missing} not found in the sequencing summary (neither 1D nor 2D column set is complete)"
    )]
    Schema { missing: &'static str },

    #[error("duplicate read_id {read_id} in the sequencing summary")]
    DuplicateKey { read_id: String },

    #[error("no reads left after filtering ({total_rows} rows in source)")]
    EmptyResult { total_rows: u64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error(
        "time window of {window_h} h needs {windows} windows to cover the run (limit {max}); use a larger --time-window"
    )]
    TooManyWindows { window_h: f64, windows: f64, max: usize },
}
