//! Full-scan Dantzig pricing: every nonbasic variable is examined every
//! call, keeping the `k` most-violating by `|dⱼ|`.

use crate::basis::VarStatus;
use crate::pricing::{Candidate, is_attractive};

/// Scan all nonbasic variables, returning up to `k` candidates sorted
/// descending by `|dⱼ|`. Uses insertion into a small fixed-size buffer
/// rather than sorting the full candidate set, since `k` is expected to
/// be small (often 1).
pub fn scan_dantzig(var_status: &[VarStatus], dj: &[f64], tau: f64, k: usize) -> Vec<Candidate> {
    let k = k.max(1);
    let mut best: Vec<Candidate> = Vec::with_capacity(k);

    for (j, &status) in var_status.iter().enumerate() {
        if !is_attractive(status, dj[j], tau) {
            continue;
        }
        let score = dj[j].abs();
        let candidate = Candidate { var: j, score };

        let pos = best.partition_point(|c| c.score >= score);
        if pos < k {
            best.insert(pos, candidate);
            if best.len() > k {
                best.truncate(k);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_top_k_by_magnitude() {
        let status = vec![VarStatus::AtLower; 5];
        let dj = [-1.0, -5.0, -2.0, -4.0, -0.5];
        let top = scan_dantzig(&status, &dj, 1e-6, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].var, 1);
        assert_eq!(top[1].var, 3);
    }

    #[test]
    fn skips_non_attractive_and_basic() {
        let status = vec![VarStatus::AtLower, VarStatus::Basic(0), VarStatus::AtUpper];
        let dj = [5.0, -100.0, -5.0];
        let top = scan_dantzig(&status, &dj, 1e-6, 5);
        assert!(top.is_empty());
    }
}
