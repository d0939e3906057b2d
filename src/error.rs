use thiserror::Error;

use crate::{basis::BasisError, matrix::MatrixError};

/// Crate-wide error returned by fallible *construction* entry points
/// (building a model view, allocating a solver context). Kernel-level
/// outcomes produced mid-solve (FTRAN, pivot, ratio test) are deliberately
/// *not* folded into this type — see `driver` for how those are mapped
/// into `Status`/`ErrorKind` at the boundary.
#[derive(Debug, Error)]
pub enum SimplexError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Basis(#[from] BasisError),

    #[error("null argument: {0}")]
    NullArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not supported: {0}")]
    NotSupported(&'static str),

    #[error("out of memory while {context}")]
    OutOfMemory { context: &'static str },
}

/// Error categories surfaced at the §6 API boundary, distinct from the
/// terminal `Status` of a completed solve (see `model::Status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfMemory,
    NullArgument,
    InvalidArgument,
    NotSupported,
}

impl SimplexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimplexError::NullArgument(_) => ErrorKind::NullArgument,
            SimplexError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SimplexError::NotSupported(_) => ErrorKind::NotSupported,
            SimplexError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            SimplexError::Matrix(_) | SimplexError::Basis(_) => ErrorKind::InvalidArgument,
        }
    }
}
