use crate::basis::eta::Eta;
use crate::numeric::KahanAccumulator;

/// Solve `B y = a` (FTRAN) against the implicit identity + eta chain
/// basis. `a` is consumed as the starting dense vector and the solution
/// is returned in place of it. Walks the chain oldest → newest.
///
/// Returns the number of nonzero touches performed (chain length plus
/// entries visited), used to drive the refactor-interval "FTRAN work
/// grew past baseline" trigger.
pub fn ftran(eta_chain: &[Eta], y: &mut [f64]) -> usize {
    let mut touched = 0usize;
    for eta in eta_chain {
        let alpha = y[eta.pivot_row] / eta.pivot_element;
        for &(i, v) in &eta.entries {
            y[i] -= alpha * v;
        }
        y[eta.pivot_row] = alpha;
        touched += 1 + eta.entries.len();
    }
    touched
}

/// Solve `Bᵀ π = c_b` (BTRAN). `c_b` is the cost vector restricted to
/// basic positions (indexed by row). Walks the chain newest → oldest;
/// since the chain is an owning `Vec`, reverse iteration needs no
/// separate pointer-collection pass (see SPEC_FULL.md §4.2).
pub fn btran(eta_chain: &[Eta], c_b: &[f64]) -> (Vec<f64>, usize) {
    let mut pi = c_b.to_vec();
    let mut touched = 0usize;
    for eta in eta_chain.iter().rev() {
        let mut sigma = KahanAccumulator::new();
        for &(i, v) in &eta.entries {
            sigma.add(pi[i] * v);
        }
        pi[eta.pivot_row] = (pi[eta.pivot_row] - sigma.sum()) / eta.pivot_element;
        touched += 1 + eta.entries.len();
    }
    (pi, touched)
}

/// Dense unit vector `e_row` of length `m`, used as the FTRAN input for
/// an artificial variable's implicit identity column.
pub fn unit_vector(m: usize, row: usize) -> Vec<f64> {
    let mut v = vec![0.0; m];
    v[row] = 1.0;
    v
}
