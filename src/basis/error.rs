use thiserror::Error;

#[derive(Debug, Error)]
pub enum BasisError {
    #[error("row {row} out of range (m={m})")]
    RowOutOfRange { row: usize, m: usize },

    #[error("variable {var} out of range (n+m={total})")]
    VariableOutOfRange { var: usize, total: usize },

    #[error("pivot element too small to append an eta: |{value}| < {tolerance}")]
    PivotTooSmall { value: f64, tolerance: f64 },

    #[error("out of memory while appending eta vector")]
    OutOfMemory,
}
