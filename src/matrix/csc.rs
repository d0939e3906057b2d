use crate::matrix::Dim;
use crate::matrix::csr::CsrMatrix;
use crate::matrix::error::CscError;
use crate::numeric::{KahanAccumulator, dot_sparse_dense};

/// Primary sparse matrix store: Compressed Sparse Column. Columns are
/// cached contiguously because variable-oriented operations (column
/// extraction for FTRAN, y = Ax against a dense x) dominate the solver's
/// inner loop. A CSR adjunct exists only to serve row-wise queries and is
/// built lazily; it never mutates this struct's CSC arrays.
#[derive(Debug, Clone)]
pub struct CscMatrix {
    pub dim: Dim,
    /// Column pointers, len = ncols + 1, monotone non-decreasing,
    /// `column_pointers[ncols] == nnz`.
    pub column_pointers: Vec<usize>,
    /// Row indices, len = nnz, ascending within each column.
    pub row_indices: Vec<usize>,
    /// Nonzero values, len = nnz.
    pub values: Vec<f64>,
    /// Lazily-built row-wise adjunct. `None` until the first row access;
    /// cleared by any mutation to the CSC arrays.
    csr: Option<CsrMatrix>,
}

impl CscMatrix {
    pub fn new(
        dim: Dim,
        column_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            dim,
            column_pointers,
            row_indices,
            values,
            csr: None,
        }
    }

    pub fn nnz(&self) -> usize {
        self.row_indices.len()
    }

    pub fn check_invariants(&self) -> Result<(), CscError> {
        if self.column_pointers.len() != self.dim.ncols + 1 {
            return Err(CscError::InvalidColumnPointersLength {
                expected: self.dim.ncols + 1,
                actual: self.column_pointers.len(),
            });
        }
        if *self.column_pointers.first().unwrap_or(&1) != 0 {
            return Err(CscError::InvalidColumnPointers {
                index: 0,
                expected: 0,
                actual: *self.column_pointers.first().unwrap_or(&1),
            });
        }
        if *self.column_pointers.last().unwrap() != self.nnz() {
            return Err(CscError::InvalidColumnPointers {
                index: self.dim.ncols,
                expected: self.nnz(),
                actual: *self.column_pointers.last().unwrap(),
            });
        }
        if self.row_indices.len() != self.values.len() {
            return Err(CscError::RowIndicesValuesLengthMismatch {
                values: self.values.len(),
                row_indices: self.row_indices.len(),
            });
        }
        for j in 0..self.dim.ncols {
            let (start, end) = (self.column_pointers[j], self.column_pointers[j + 1]);
            if start > end || end > self.nnz() {
                return Err(CscError::InvalidColumnPointers {
                    index: j,
                    expected: start,
                    actual: end,
                });
            }
            let mut prev: Option<usize> = None;
            for &r in &self.row_indices[start..end] {
                if r >= self.dim.nrows {
                    return Err(CscError::OutOfBoundsIndex {
                        index: r,
                        max: self.dim.nrows,
                    });
                }
                if let Some(p) = prev {
                    if r <= p {
                        return Err(CscError::RowsNotStrictlyIncreasing {
                            index: j,
                            prev: p,
                            actual: r,
                        });
                    }
                }
                prev = Some(r);
            }
        }
        Ok(())
    }

    /// Return (row_indices, values) slice for column `j`.
    #[inline]
    pub fn col(&self, j: usize) -> (&[usize], &[f64]) {
        let (s, e) = (self.column_pointers[j], self.column_pointers[j + 1]);
        (&self.row_indices[s..e], &self.values[s..e])
    }

    /// Lazily build (idempotent: a no-op if already built) and return the
    /// CSR adjunct.
    pub fn ensure_csr(&mut self) -> Result<&CsrMatrix, crate::matrix::error::CsrError> {
        if self.csr.is_none() {
            self.csr = Some(CsrMatrix::build_from_csc(self)?);
        }
        Ok(self.csr.as_ref().unwrap())
    }

    /// Drop the cached CSR adjunct; call after any CSC mutation.
    pub fn invalidate_csr(&mut self) {
        self.csr = None;
    }

    pub fn has_csr(&self) -> bool {
        self.csr.is_some()
    }

    /// y ← Ax (overwrite == true) or y ← y + Ax. Columns with `x[j] == 0`
    /// are skipped — common for sparse work vectors during Phase I.
    pub fn matvec(&self, x: &[f64], y: &mut [f64], overwrite: bool) {
        debug_assert_eq!(x.len(), self.dim.ncols);
        debug_assert_eq!(y.len(), self.dim.nrows);
        if overwrite {
            y.iter_mut().for_each(|v| *v = 0.0);
        }
        for j in 0..self.dim.ncols {
            let xj = x[j];
            if xj == 0.0 {
                continue;
            }
            let (rows, vals) = self.col(j);
            for (&r, &a) in rows.iter().zip(vals.iter()) {
                y[r] += a * xj;
            }
        }
    }

    /// y ← Aᵀx (overwrite == true) or y ← y + Aᵀx, via a column sweep
    /// (no CSR required). O(nnz).
    pub fn matvec_transpose(&self, x: &[f64], y: &mut [f64], overwrite: bool) {
        debug_assert_eq!(x.len(), self.dim.nrows);
        debug_assert_eq!(y.len(), self.dim.ncols);
        for j in 0..self.dim.ncols {
            let (rows, vals) = self.col(j);
            let mut acc = KahanAccumulator::new();
            for (&r, &a) in rows.iter().zip(vals.iter()) {
                acc.add(a * x[r]);
            }
            if overwrite {
                y[j] = acc.sum();
            } else {
                y[j] += acc.sum();
            }
        }
    }

    /// Dot product of column `j` against a dense vector.
    pub fn col_dot_dense(&self, j: usize, dense: &[f64]) -> f64 {
        let (rows, vals) = self.col(j);
        dot_sparse_dense(rows, vals, dense)
    }

    /// Scatter column `j` into dense work vector `w` with scaling:
    /// `w[row] = alpha * val` for every nonzero of the column. Returns the
    /// number of entries written.
    pub fn scatter_col(&self, j: usize, alpha: f64, w: &mut [f64]) -> usize {
        let (rows, vals) = self.col(j);
        for (&i, &a) in rows.iter().zip(vals.iter()) {
            w[i] = alpha * a;
        }
        rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::builder::MatrixBuilder;

    fn sample() -> CscMatrix {
        // A = [ 10  0  3
        //       0  20  0
        //       2   0 30 ]
        let mut b = MatrixBuilder::new(3, 3);
        b.push(0, 0, 10.0).unwrap();
        b.push(2, 0, 3.0).unwrap();
        b.push(1, 1, 20.0).unwrap();
        b.push(0, 2, 2.0).unwrap();
        b.push(2, 2, 30.0).unwrap();
        b.build_csc().unwrap()
    }

    #[test]
    fn matvec_matches_hand_computation() {
        let a = sample();
        let x = [1.0, 1.0, 1.0];
        let mut y = [0.0; 3];
        a.matvec(&x, &mut y, true);
        assert_eq!(y, [13.0, 20.0, 32.0]);
    }

    #[test]
    fn matvec_transpose_matches_hand_computation() {
        let a = sample();
        let x = [1.0, 1.0, 1.0];
        let mut y = [0.0; 3];
        a.matvec_transpose(&x, &mut y, true);
        assert_eq!(y, [12.0, 20.0, 33.0]);
    }

    #[test]
    fn matvec_skips_zero_columns_of_x() {
        let a = sample();
        let x = [0.0, 5.0, 0.0];
        let mut y = [1.0, 1.0, 1.0];
        a.matvec(&x, &mut y, false);
        assert_eq!(y, [1.0, 101.0, 1.0]);
    }

    #[test]
    fn csr_build_is_idempotent() {
        let mut a = sample();
        assert!(!a.has_csr());
        let first = a.ensure_csr().unwrap().row_ptr.clone();
        let second = a.ensure_csr().unwrap().row_ptr.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn mutation_must_invalidate_csr() {
        let mut a = sample();
        a.ensure_csr().unwrap();
        assert!(a.has_csr());
        a.values[0] = 999.0;
        a.invalidate_csr();
        assert!(!a.has_csr());
        let csr = a.ensure_csr().unwrap();
        let (cols, vals) = csr.row(0);
        let pos = cols.iter().position(|&c| c == 0).unwrap();
        assert_eq!(vals[pos], 999.0);
    }
}
