//! Entering-variable selection: strategy-tagged candidate scanning plus
//! the shared attractiveness rule, edge-weight update, and two-phase
//! escalation (`step2`) that every strategy falls back to when it
//! reports "nothing to price" too early.

pub mod dantzig;
pub mod edge_weight;
pub mod partial;

use crate::basis::VarStatus;
use crate::matrix::CscMatrix;
use crate::numeric::INFINITY;

/// One priced candidate: the nonbasic variable index and its score
/// (strategy-defined — `|dⱼ|` for Dantzig/partial, `dⱼ²/γⱼ` for SE/Devex).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub var: usize,
    pub score: f64,
}

/// Which pricing rule is active for the life of a solve context. Chosen
/// once at setup (§4.3); never switched mid-solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStrategy {
    Dantzig,
    Partial,
    SteepestEdge,
    Devex,
}

/// Invalidation bitmask passed to `PricingState::invalidate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidate {
    Candidates,
    Weights,
    All,
}

/// Problem size below which Dantzig's full scan is cheaper than
/// partitioning into sections.
pub const SMALL_PROBLEM_THRESHOLD: usize = 200;
/// Target minimum candidates per partial-pricing section.
pub const MIN_SECTION_SIZE: usize = 100;
/// Floor applied to steepest-edge / Devex weights to avoid blow-up when
/// dividing by a near-zero edge weight.
pub const WEIGHT_FLOOR: f64 = 1.0e-10;

#[derive(Debug, Clone)]
pub struct PricingState {
    pub strategy: PricingStrategy,
    pub num_sections: usize,
    pub current_section: usize,
    pub section_size: usize,
    /// Edge weights for SE/Devex, length n+m, initialized to 1.0. Unused
    /// (left at 1.0) for Dantzig/partial.
    pub weights: Vec<f64>,
    pub candidates_valid: bool,
    pub weights_valid: bool,
    pub scan_count: usize,
    pub escalation_count: usize,
}

impl PricingState {
    pub fn new(strategy: PricingStrategy, n_total: usize) -> Self {
        let num_sections = if matches!(strategy, PricingStrategy::Partial) {
            (n_total / MIN_SECTION_SIZE).max(1)
        } else {
            1
        };
        let section_size = n_total.div_ceil(num_sections).max(1);
        Self {
            strategy,
            num_sections,
            current_section: 0,
            section_size,
            weights: vec![1.0; n_total],
            candidates_valid: false,
            weights_valid: true,
            scan_count: 0,
            escalation_count: 0,
        }
    }

    /// Pick the strategy implied by problem size and explicit request,
    /// per §4.3's setup-time rule.
    pub fn select_strategy(n: usize, requested: Option<PricingStrategy>) -> PricingStrategy {
        match requested {
            Some(s) => s,
            None if n < SMALL_PROBLEM_THRESHOLD => PricingStrategy::Dantzig,
            None => PricingStrategy::Partial,
        }
    }

    pub fn invalidate(&mut self, mask: Invalidate) {
        match mask {
            Invalidate::Candidates => self.candidates_valid = false,
            Invalidate::Weights => {
                self.weights.iter_mut().for_each(|w| *w = 1.0);
                self.weights_valid = false;
            }
            Invalidate::All => {
                self.candidates_valid = false;
                self.weights.iter_mut().for_each(|w| *w = 1.0);
                self.weights_valid = false;
            }
        }
    }

    pub fn advance_section(&mut self) {
        self.current_section = (self.current_section + 1) % self.num_sections;
    }
}

/// Shared attractiveness rule (§4.3): whether nonbasic variable `j` with
/// status `status` and reduced cost `dj` is a valid pricing candidate.
#[inline]
pub fn is_attractive(status: VarStatus, dj: f64, tau: f64) -> bool {
    match status {
        VarStatus::AtLower => dj < -tau,
        VarStatus::AtUpper => dj > tau,
        VarStatus::Free => dj.abs() > tau,
        VarStatus::Basic(_) => false,
    }
}

/// Dispatch a single pricing scan to the active strategy, returning
/// ranked candidates (best first). `k` bounds the candidate list length
/// for Dantzig; partial/SE/Devex ignore it.
pub fn scan(
    state: &mut PricingState,
    var_status: &[VarStatus],
    dj: &[f64],
    tau: f64,
    k: usize,
) -> Vec<Candidate> {
    state.scan_count += 1;
    match state.strategy {
        PricingStrategy::Dantzig => dantzig::scan_dantzig(var_status, dj, tau, k),
        PricingStrategy::Partial => partial::scan_partial(state, var_status, dj, tau),
        PricingStrategy::SteepestEdge => edge_weight::scan_weighted(var_status, dj, &state.weights, tau),
        PricingStrategy::Devex => edge_weight::scan_weighted(var_status, dj, &state.weights, tau),
    }
}

/// Two-phase completion (§4.3): called when `scan` returned empty and
/// the problem isn't yet known to be optimal. Escalates to a wider scan
/// so "no candidates" is trustworthy evidence of optimality.
pub fn step2(state: &mut PricingState, var_status: &[VarStatus], dj: &[f64], tau: f64) -> Vec<Candidate> {
    state.escalation_count += 1;
    match state.strategy {
        PricingStrategy::Dantzig => Vec::new(),
        PricingStrategy::Partial => partial::scan_full_sweep(var_status, dj, tau),
        PricingStrategy::SteepestEdge | PricingStrategy::Devex => {
            edge_weight::scan_weighted(var_status, dj, &state.weights, tau)
        }
    }
}

/// Reduced-cost and edge-weight update after a pivot (§4.3's "update
/// after pivot"). `alpha_row` is the pivot row of B⁻¹ applied against
/// every column (i.e. `alpha_j = A_j · (row r of B⁻¹)`, obtained via a
/// BTRAN against `e_r`); `rho`/`tau_btran` are the BTRAN products against
/// the leaving row used by the SE weight recursion. Only `dj`/`weights`
/// for nonbasic `j` are meaningful after return; `entering`/`leaving`
/// slots are fixed up separately by the caller since their post-pivot
/// status is basis bookkeeping, not a pricing concern.
pub fn update_after_pivot(
    a: &CscMatrix,
    alpha_row: &[f64],
    rho: &[f64],
    entering_var: usize,
    leaving_var: usize,
    d_entering: f64,
    pivot_element: f64,
    var_status: &[VarStatus],
    dj: &mut [f64],
    weights: &mut [f64],
    strategy: PricingStrategy,
) {
    let ratio = d_entering / pivot_element;
    let n = a.dim.ncols;
    let m = a.dim.nrows;
    let n_total = dj.len();

    for j in 0..n_total {
        if j == entering_var || var_status[j].is_basic() {
            continue;
        }
        let alpha_j = column_alpha(a, n, m, j, alpha_row);
        if alpha_j == 0.0 {
            continue;
        }
        dj[j] -= ratio * alpha_j;

        if matches!(strategy, PricingStrategy::SteepestEdge | PricingStrategy::Devex) {
            let rho_j = column_alpha(a, n, m, j, rho);
            let gamma = weights[j] - 2.0 * alpha_j * rho_j + alpha_j * alpha_j * weights[entering_var];
            weights[j] = gamma.max(WEIGHT_FLOOR);
        }
    }

    // the leaving variable's own weight is derived from the pivot column.
    if matches!(strategy, PricingStrategy::SteepestEdge | PricingStrategy::Devex) {
        weights[leaving_var] = (weights[entering_var] / (pivot_element * pivot_element)).max(WEIGHT_FLOOR);
    }
    dj[entering_var] = 0.0;
}

/// `alpha_j = A_j · v` for structural column `j`, or `v[j-n]` for the
/// implicit identity column of artificial variable `j` (j >= n).
fn column_alpha(a: &CscMatrix, n: usize, m: usize, j: usize, v: &[f64]) -> f64 {
    if j < n {
        a.col_dot_dense(j, v)
    } else {
        let row = j - n;
        if row < m { v[row] } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attractiveness_matches_status_rule() {
        assert!(is_attractive(VarStatus::AtLower, -1.0, 1e-6));
        assert!(!is_attractive(VarStatus::AtLower, 1.0, 1e-6));
        assert!(is_attractive(VarStatus::AtUpper, 1.0, 1e-6));
        assert!(!is_attractive(VarStatus::AtUpper, -1.0, 1e-6));
        assert!(is_attractive(VarStatus::Free, -2.0, 1e-6));
        assert!(is_attractive(VarStatus::Free, 2.0, 1e-6));
        assert!(!is_attractive(VarStatus::Basic(0), 100.0, 1e-6));
    }

    #[test]
    fn select_strategy_defaults_on_size() {
        assert_eq!(
            PricingState::select_strategy(10, None),
            PricingStrategy::Dantzig
        );
        assert_eq!(
            PricingState::select_strategy(10_000, None),
            PricingStrategy::Partial
        );
        assert_eq!(
            PricingState::select_strategy(10, Some(PricingStrategy::Devex)),
            PricingStrategy::Devex
        );
    }

    #[test]
    fn invalidate_weights_resets_to_one_and_clears_flag() {
        let mut p = PricingState::new(PricingStrategy::Devex, 4);
        p.weights[2] = 5.0;
        p.weights_valid = true;
        p.invalidate(Invalidate::Weights);
        assert!(p.weights.iter().all(|&w| w == 1.0));
        assert!(!p.weights_valid);
    }

    #[test]
    fn invalidate_infinity_sentinel_is_untouched_by_weights() {
        // weights have nothing to do with the infinity sentinel; this
        // just guards against accidentally importing the wrong constant.
        assert!(INFINITY > 1.0e50);
    }
}
