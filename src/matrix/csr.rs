use crate::matrix::Dim;
use crate::matrix::csc::CscMatrix;
use crate::matrix::error::CsrError;

/// Compressed Sparse Row adjunct, built lazily from a `CscMatrix` the
/// first time row-wise access is required. CSR existence never mutates
/// the owning CSC's storage.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    pub dim: Dim,
    /// Row pointers, len = nrows + 1.
    pub row_ptr: Vec<usize>,
    /// Column indices, len = nnz, ascending within each row.
    pub col_idx: Vec<usize>,
    /// Nonzero values, len = nnz, bit-exact copy of the source CSC values.
    pub row_values: Vec<f64>,
}

impl CsrMatrix {
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Build CSR from `a` via the prepare / build / finalize pipeline:
    /// a counting pass over (col, row) pairs, a cumulative-sum pass to
    /// turn counts into starting offsets, then a reverse-order scatter
    /// that lands column indices within each row in ascending order
    /// without a post-sort.
    pub fn build_from_csc(a: &CscMatrix) -> Result<CsrMatrix, CsrError> {
        let m = a.dim.nrows;
        let n = a.dim.ncols;
        let nnz = a.nnz();

        // --- prepare ---
        let mut row_ptr = vec![0usize; m + 1];

        // --- build, pass A: count entries per row ---
        for &r in &a.row_indices {
            row_ptr[r + 1] += 1;
        }
        // cumulative-sum pass: counts -> starting offsets
        for i in 0..m {
            row_ptr[i + 1] += row_ptr[i];
        }
        debug_assert_eq!(row_ptr[m], nnz);

        let mut col_idx = vec![0usize; nnz];
        let mut row_values = vec![0.0_f64; nnz];
        // workspace: next free slot within each row, seeded from the starts
        let mut next = row_ptr.clone();

        // --- build, pass B: iterate columns and their nonzeros in reverse ---
        for j in (0..n).rev() {
            let (rows, vals) = a.col(j);
            for k in (0..rows.len()).rev() {
                let r = rows[k];
                next[r] -= 1;
                let p = next[r];
                col_idx[p] = j;
                row_values[p] = vals[k];
            }
        }

        // --- finalize ---
        Ok(CsrMatrix {
            dim: a.dim,
            row_ptr,
            col_idx,
            row_values,
        })
    }

    pub fn check_invariants(&self) -> Result<(), CsrError> {
        if self.row_ptr.len() != self.dim.nrows + 1 {
            return Err(CsrError::InvalidRowPointersLength {
                expected: self.dim.nrows + 1,
                actual: self.row_ptr.len(),
            });
        }
        if *self.row_ptr.last().unwrap() != self.nnz() {
            return Err(CsrError::InvalidRowPointers {
                index: self.dim.nrows,
                expected: self.nnz(),
                actual: *self.row_ptr.last().unwrap(),
            });
        }
        if self.col_idx.len() != self.row_values.len() {
            return Err(CsrError::ColumnIndicesValuesLengthMismatch {
                values: self.row_values.len(),
                column_indices: self.col_idx.len(),
            });
        }
        for i in 0..self.dim.nrows {
            let (s, e) = (self.row_ptr[i], self.row_ptr[i + 1]);
            if s > e || e > self.nnz() {
                return Err(CsrError::InvalidRowPointers {
                    index: i,
                    expected: s,
                    actual: e,
                });
            }
            let mut prev: Option<usize> = None;
            for &c in &self.col_idx[s..e] {
                if c >= self.dim.ncols {
                    return Err(CsrError::OutOfBoundsIndex {
                        index: c,
                        max: self.dim.ncols,
                    });
                }
                if let Some(p) = prev {
                    if c <= p {
                        return Err(CsrError::ColumnsNotStrictlyIncreasing {
                            index: i,
                            prev: p,
                            actual: c,
                        });
                    }
                }
                prev = Some(c);
            }
        }
        Ok(())
    }

    /// Return (col_idx, values) slice for row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let (s, e) = (self.row_ptr[i], self.row_ptr[i + 1]);
        (&self.col_idx[s..e], &self.row_values[s..e])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::builder::MatrixBuilder;

    #[test]
    fn build_and_access_rows() {
        let mut b = MatrixBuilder::new(3, 3);
        b.push(0, 0, 10.0).unwrap();
        b.push(2, 0, 3.0).unwrap();
        b.push(1, 1, 20.0).unwrap();
        b.push(0, 2, 2.0).unwrap();
        b.push(2, 2, 30.0).unwrap();
        let a = b.build_csc().unwrap();

        let csr = CsrMatrix::build_from_csc(&a).unwrap();
        assert!(csr.check_invariants().is_ok());
        assert_eq!(csr.row_ptr[3], csr.nnz());

        let (c0, v0) = csr.row(0);
        assert_eq!(c0, &[0, 2]);
        assert_eq!(v0, &[10.0, 2.0]);

        let (c1, v1) = csr.row(1);
        assert_eq!(c1, &[1]);
        assert_eq!(v1, &[20.0]);

        let (c2, v2) = csr.row(2);
        assert_eq!(c2, &[0, 2]);
        assert_eq!(v2, &[3.0, 30.0]);
    }

    #[test]
    fn csc_to_csr_and_back_recovers_original() {
        let mut b = MatrixBuilder::new(4, 5);
        let entries = [
            (0usize, 0usize, 1.0),
            (0, 3, 2.0),
            (1, 1, 3.0),
            (2, 1, 4.0),
            (2, 2, 5.0),
            (4, 3, 6.0),
        ];
        for &(c, r, v) in &entries {
            b.push(c, r, v).unwrap();
        }
        let a = b.build_csc().unwrap();
        let csr = CsrMatrix::build_from_csc(&a).unwrap();

        // transpose the CSR back into CSC form and compare column-by-column.
        let mut bt = MatrixBuilder::new(a.dim.nrows, a.dim.ncols);
        for row in 0..csr.dim.nrows {
            let (cols, vals) = csr.row(row);
            for (&c, &v) in cols.iter().zip(vals.iter()) {
                bt.push(c, row, v).unwrap();
            }
        }
        let recovered = bt.build_csc().unwrap();

        assert_eq!(recovered.column_pointers, a.column_pointers);
        assert_eq!(recovered.row_indices, a.row_indices);
        assert_eq!(recovered.values, a.values);
    }
}
