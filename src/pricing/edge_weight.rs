//! Steepest-edge and Devex pricing share the same scan: rank attractive
//! nonbasic variables by `dⱼ² / γⱼ`, the edge weight `γⱼ` floored to
//! avoid a division blow-up. Devex differs only in how `γⱼ` is
//! maintained between pivots (see `update_after_pivot` in `pricing::mod`);
//! the scan itself is identical.

use crate::basis::VarStatus;
use crate::pricing::{Candidate, WEIGHT_FLOOR, is_attractive};

/// Scan all nonbasic variables, scoring attractive ones by `dⱼ²/γⱼ` and
/// returning the single best candidate (steepest-edge / Devex pick one
/// entering variable per iteration, unlike Dantzig's top-k).
pub fn scan_weighted(var_status: &[VarStatus], dj: &[f64], weights: &[f64], tau: f64) -> Vec<Candidate> {
    let mut best: Option<Candidate> = None;
    for (j, &status) in var_status.iter().enumerate() {
        if !is_attractive(status, dj[j], tau) {
            continue;
        }
        let gamma = weights[j].max(WEIGHT_FLOOR);
        let score = (dj[j] * dj[j]) / gamma;
        if best.map(|b| score > b.score).unwrap_or(true) {
            best = Some(Candidate { var: j, score });
        }
    }
    best.into_iter().collect()
}
