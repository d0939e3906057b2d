//! Owned-storage convenience builder for assembling a small LP in tests
//! and benchmarks without hand-writing CSC arrays. Not part of the §6
//! boundary — callers outside this crate are expected to already hold a
//! `CscMatrix` and call `ModelView::new` directly.

use crate::error::SimplexError;
use crate::matrix::builder::MatrixBuilder;
use crate::matrix::CscMatrix;
use crate::model::{ModelView, Sense};

#[derive(Debug, Clone)]
pub struct LpData {
    pub n: usize,
    pub m: usize,
    pub c: Vec<f64>,
    pub lb: Vec<f64>,
    pub ub: Vec<f64>,
    pub a: CscMatrix,
    pub rhs: Vec<f64>,
    pub sense: Vec<Sense>,
}

impl LpData {
    pub fn as_view(&self) -> Result<ModelView<'_>, SimplexError> {
        ModelView::new(
            self.n, self.m, &self.c, &self.lb, &self.ub, &self.a, &self.rhs, &self.sense,
        )
    }
}

/// Accumulates objective coefficients, bounds, and constraint rows, then
/// assembles them into owned column-major storage on `build`.
pub struct LpBuilder {
    n: usize,
    m: usize,
    c: Vec<f64>,
    lb: Vec<f64>,
    ub: Vec<f64>,
    entries: MatrixBuilder,
    rhs: Vec<f64>,
    sense: Vec<Sense>,
}

impl LpBuilder {
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            c: vec![0.0; n],
            lb: vec![0.0; n],
            ub: vec![f64::INFINITY; n],
            entries: MatrixBuilder::new(m, n),
            rhs: vec![0.0; m],
            sense: vec![Sense::Le; m],
        }
    }

    pub fn cost(&mut self, j: usize, value: f64) -> &mut Self {
        self.c[j] = value;
        self
    }

    pub fn bounds(&mut self, j: usize, lb: f64, ub: f64) -> &mut Self {
        self.lb[j] = lb;
        self.ub[j] = ub;
        self
    }

    pub fn coef(&mut self, row: usize, col: usize, value: f64) -> Result<&mut Self, SimplexError> {
        self.entries
            .push(col, row, value)
            .map_err(|e| SimplexError::InvalidArgument(e.to_string()))?;
        Ok(self)
    }

    pub fn row(&mut self, row: usize, sense: Sense, rhs: f64) -> &mut Self {
        self.sense[row] = sense;
        self.rhs[row] = rhs;
        self
    }

    pub fn build(self) -> Result<LpData, SimplexError> {
        let a = self
            .entries
            .build_csc()
            .map_err(|e| SimplexError::InvalidArgument(e.to_string()))?;
        Ok(LpData {
            n: self.n,
            m: self.m,
            c: self.c,
            lb: self.lb,
            ub: self.ub,
            a,
            rhs: self.rhs,
            sense: self.sense,
        })
    }
}
