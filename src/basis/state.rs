use crate::basis::error::BasisError;
use crate::basis::eta::{Eta, EtaKind};

/// A single tagged variant replacing the magic-number status codes
/// ({-1,-2,-3,>=0}) that spec.md's wire-level model threads through
/// every module. Integer codes are produced/consumed only at the §6
/// boundary (`to_code`/`from_code`), never compared against directly
/// inside the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarStatus {
    Basic(usize),
    AtLower,
    AtUpper,
    /// Free or superbasic (no finite bound is currently binding).
    Free,
}

impl VarStatus {
    pub fn to_code(self) -> isize {
        match self {
            VarStatus::Basic(row) => row as isize,
            VarStatus::AtLower => -1,
            VarStatus::AtUpper => -2,
            VarStatus::Free => -3,
        }
    }

    pub fn from_code(code: isize) -> Self {
        match code {
            -1 => VarStatus::AtLower,
            -2 => VarStatus::AtUpper,
            -3 => VarStatus::Free,
            row if row >= 0 => VarStatus::Basic(row as usize),
            _ => panic!("invalid status code: {code}"),
        }
    }

    pub fn is_basic(self) -> bool {
        matches!(self, VarStatus::Basic(_))
    }
}

/// Owns the basis header, variable status, eta chain, and the one dense
/// scratch array the FTRAN/BTRAN/pricing kernels share. A single
/// `BasisState` is the unit of exclusion for a solve (§5).
#[derive(Debug, Clone)]
pub struct BasisState {
    /// For each row, which variable is basic there. len = m.
    pub basic_vars: Vec<usize>,
    /// Status of every structural + artificial variable. len = n + m.
    pub var_status: Vec<VarStatus>,
    pub eta_chain: Vec<Eta>,
    pub eta_count: usize,
    pub pivots_since_refactor: usize,
    pub iteration: usize,
    pub last_refactor_iter: usize,
    pub eta_memory_bytes: usize,
    /// FTRAN "work" (nonzeros touched) recorded immediately after the
    /// last refactor, used as the baseline for the refactor-interval
    /// time-growth trigger. A deterministic nonzero-touch counter stands
    /// in for wall-clock FTRAN time so the trigger — and therefore the
    /// pivot sequence — stays reproducible across machines (§5).
    pub baseline_ftran_work: Option<usize>,
    pub last_ftran_work: usize,
    /// Dense m-length scratch shared by FTRAN/BTRAN/ratio-test callers.
    pub work: Vec<f64>,
}

impl BasisState {
    pub fn new(m: usize, n_total: usize) -> Self {
        Self {
            basic_vars: vec![0; m],
            var_status: vec![VarStatus::AtLower; n_total],
            eta_chain: Vec::new(),
            eta_count: 0,
            pivots_since_refactor: 0,
            iteration: 0,
            last_refactor_iter: 0,
            eta_memory_bytes: 0,
            baseline_ftran_work: None,
            last_ftran_work: 0,
            work: vec![0.0; m],
        }
    }

    /// Append an eta representing one successful pivot. `dense_column`
    /// is the FTRAN-computed pivot column in the *current* basis
    /// (length m). `leaving_status` is the status the ratio test decided
    /// the leaving variable should take (which bound it hit) — plumbed
    /// through explicitly rather than hardcoded to "at lower" per the
    /// resolved Open Question (see DESIGN.md).
    pub fn append_eta(
        &mut self,
        pivot_row: usize,
        entering_var: usize,
        leaving_var: usize,
        leaving_status: VarStatus,
        dense_column: &[f64],
        pivot_tolerance: f64,
    ) -> Result<(), BasisError> {
        if pivot_row >= self.basic_vars.len() {
            return Err(BasisError::RowOutOfRange {
                row: pivot_row,
                m: self.basic_vars.len(),
            });
        }
        let pivot_element = dense_column[pivot_row];
        if pivot_element.abs() < pivot_tolerance {
            return Err(BasisError::PivotTooSmall {
                value: pivot_element,
                tolerance: pivot_tolerance,
            });
        }

        let entries: Vec<(usize, f64)> = dense_column
            .iter()
            .enumerate()
            .filter(|&(i, &v)| i != pivot_row && v != 0.0)
            .map(|(i, &v)| (i, v))
            .collect();

        let eta = Eta {
            kind: EtaKind::Pivot,
            pivot_row,
            pivot_var: entering_var,
            leaving_var,
            entries,
            pivot_element,
            leaving_status,
        };

        self.eta_memory_bytes += eta.memory_bytes();
        self.eta_chain.push(eta);
        self.basic_vars[pivot_row] = entering_var;
        self.var_status[entering_var] = VarStatus::Basic(pivot_row);
        self.var_status[leaving_var] = leaving_status;

        self.eta_count += 1;
        self.pivots_since_refactor += 1;
        self.iteration += 1;
        Ok(())
    }

    /// Clear the eta chain and reset the baseline to identity, per the
    /// "reset to current basis header" refactorization mandated by
    /// spec.md §9 (true LU refactorization is future work).
    pub fn refactor(&mut self) {
        self.eta_chain.clear();
        self.eta_count = 0;
        self.pivots_since_refactor = 0;
        self.eta_memory_bytes = 0;
        self.baseline_ftran_work = None;
        self.last_refactor_iter = self.iteration;
    }

    /// Record the nonzero-touch count of the FTRAN just performed,
    /// seeding the baseline the first time this is called after a
    /// refactor.
    pub fn record_ftran_work(&mut self, touched: usize) {
        self.last_ftran_work = touched;
        if self.baseline_ftran_work.is_none() {
            self.baseline_ftran_work = Some(touched.max(1));
        }
    }

    /// Whether the accumulated state crosses any of the three
    /// refactorization triggers from spec.md §4.2.
    pub fn needs_refactor(
        &self,
        refactor_interval: usize,
        max_eta_memory_bytes: usize,
        ftran_growth_factor: f64,
    ) -> bool {
        if self.pivots_since_refactor >= refactor_interval {
            return true;
        }
        if self.eta_memory_bytes > max_eta_memory_bytes {
            return true;
        }
        if let Some(baseline) = self.baseline_ftran_work {
            if (self.last_ftran_work as f64) > (baseline as f64) * ftran_growth_factor {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_roundtrip() {
        for s in [VarStatus::AtLower, VarStatus::AtUpper, VarStatus::Free, VarStatus::Basic(7)] {
            assert_eq!(VarStatus::from_code(s.to_code()), s);
        }
    }

    #[test]
    fn append_eta_updates_basis_header() {
        let mut b = BasisState::new(3, 6);
        b.basic_vars = vec![3, 4, 5];
        for (i, &v) in b.basic_vars.iter().enumerate() {
            b.var_status[v] = VarStatus::Basic(i);
        }

        let col = [2.0, 0.0, -1.0];
        b.append_eta(0, 0, 3, VarStatus::AtLower, &col, 1e-10).unwrap();

        assert_eq!(b.basic_vars[0], 0);
        assert_eq!(b.var_status[0], VarStatus::Basic(0));
        assert_eq!(b.var_status[3], VarStatus::AtLower);
        assert_eq!(b.eta_count, 1);
        assert_eq!(b.pivots_since_refactor, 1);
        assert_eq!(b.eta_chain[0].entries, vec![(2, -1.0)]);
    }

    #[test]
    fn append_eta_rejects_tiny_pivot() {
        let mut b = BasisState::new(2, 4);
        let col = [1e-12, 0.0];
        let err = b.append_eta(0, 0, 2, VarStatus::AtLower, &col, 1e-10).unwrap_err();
        assert!(matches!(err, BasisError::PivotTooSmall { .. }));
    }

    #[test]
    fn refactor_clears_chain_and_resets_counters() {
        let mut b = BasisState::new(2, 4);
        let col = [2.0, 1.0];
        b.append_eta(0, 0, 2, VarStatus::AtLower, &col, 1e-10).unwrap();
        assert_eq!(b.eta_count, 1);

        b.refactor();
        assert!(b.eta_chain.is_empty());
        assert_eq!(b.eta_count, 0);
        assert_eq!(b.pivots_since_refactor, 0);
        assert_eq!(b.eta_memory_bytes, 0);
    }

    #[test]
    fn needs_refactor_triggers_on_interval() {
        let mut b = BasisState::new(1, 2);
        let col = [1.0];
        b.append_eta(0, 0, 1, VarStatus::AtLower, &col, 1e-10).unwrap();
        assert!(b.needs_refactor(1, usize::MAX, 1e9));
        assert!(!b.needs_refactor(2, usize::MAX, 1e9));
    }
}
