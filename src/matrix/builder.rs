use crate::matrix::Dim;
use crate::matrix::csc::CscMatrix;
use crate::matrix::error::CscError;

/// Builder from COO triplets into a canonical CSC matrix. Not part of the
/// public solver boundary (§6 treats model construction as an external
/// collaborator) — this exists for tests and the benchmark harness to
/// construct `CscMatrix` values without hand-rolling column pointers.
///
/// Usage:
///   let mut b = MatrixBuilder::new(nrows, ncols);
///   b.reserve(nnz_guess);
///   b.push(col, row, val)?; ...
///   let a = b.build_csc()?;
#[derive(Debug)]
pub struct MatrixBuilder {
    dim: Dim,
    /// (column, row, value) triplets, not yet sorted or combined.
    entries: Vec<(usize, usize, f64)>,
}

impl MatrixBuilder {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            dim: Dim { nrows, ncols },
            entries: Vec::new(),
        }
    }

    pub fn reserve(&mut self, nnz: usize) {
        self.entries.reserve(nnz);
    }

    pub fn push(&mut self, column: usize, row: usize, value: f64) -> Result<(), CscError> {
        if column >= self.dim.ncols {
            return Err(CscError::OutOfBoundsIndex {
                index: column,
                max: self.dim.ncols,
            });
        }
        if row >= self.dim.nrows {
            return Err(CscError::OutOfBoundsIndex {
                index: row,
                max: self.dim.nrows,
            });
        }
        self.entries.push((column, row, value));
        Ok(())
    }

    /// Combine duplicate (column, row) entries by summation, dropping
    /// zero-valued results, and return them sorted by (column, row).
    fn combined_sorted_entries(&self) -> Vec<(usize, usize, f64)> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|&(c, r, _)| (c, r));

        let mut combined = Vec::with_capacity(entries.len());
        let mut iter = entries.into_iter().peekable();
        while let Some((c, r, mut v)) = iter.next() {
            while let Some(&(c2, r2, v2)) = iter.peek() {
                if c2 == c && r2 == r {
                    v += v2;
                    iter.next();
                } else {
                    break;
                }
            }
            if v != 0.0 {
                combined.push((c, r, v));
            }
        }
        combined
    }

    pub fn build_csc(self) -> Result<CscMatrix, CscError> {
        let n = self.dim.ncols;
        let combined = self.combined_sorted_entries();

        let mut column_pointers = vec![0usize; n + 1];
        for &(c, _, _) in &combined {
            column_pointers[c + 1] += 1;
        }
        for j in 0..n {
            column_pointers[j + 1] += column_pointers[j];
        }

        let nnz = combined.len();
        let mut row_indices = vec![0usize; nnz];
        let mut values = vec![0.0_f64; nnz];
        let mut next = column_pointers.clone();
        for (c, r, v) in combined {
            let p = next[c];
            row_indices[p] = r;
            values[p] = v;
            next[c] += 1;
        }

        let a = CscMatrix::new(self.dim, column_pointers, row_indices, values);
        debug_assert!(a.check_invariants().is_ok());
        Ok(a)
    }
}
