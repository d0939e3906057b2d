use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error(transparent)]
    Csc(#[from] CscError),

    #[error(transparent)]
    Csr(#[from] CsrError),
}

#[derive(Debug, Error)]
pub enum CscError {
    #[error("out of bounds index: {index} (max: {max})")]
    OutOfBoundsIndex { index: usize, max: usize },

    #[error("invalid column pointers length: {expected} (actual: {actual})")]
    InvalidColumnPointersLength { expected: usize, actual: usize },

    #[error("invalid column pointers: col {index} (expected: {expected}, actual: {actual})")]
    InvalidColumnPointers {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row indices/values length mismatch: {values} values, {row_indices} row indices")]
    RowIndicesValuesLengthMismatch { values: usize, row_indices: usize },

    #[error("rows not strictly increasing in column {index}: {prev} then {actual}")]
    RowsNotStrictlyIncreasing {
        index: usize,
        prev: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum CsrError {
    #[error("out of bounds index: {index} (max: {max})")]
    OutOfBoundsIndex { index: usize, max: usize },

    #[error("invalid row pointers length: {expected} (actual: {actual})")]
    InvalidRowPointersLength { expected: usize, actual: usize },

    #[error("invalid row pointers: row {index} (expected: {expected}, actual: {actual})")]
    InvalidRowPointers {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("column indices/values length mismatch: {values} values, {column_indices} column indices")]
    ColumnIndicesValuesLengthMismatch {
        values: usize,
        column_indices: usize,
    },

    #[error("columns not strictly increasing in row {index}: {prev} then {actual}")]
    ColumnsNotStrictlyIncreasing {
        index: usize,
        prev: usize,
        actual: usize,
    },

    #[error("out of memory while building CSR from CSC")]
    OutOfMemory,
}
