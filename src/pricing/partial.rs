//! Partial pricing: scan only the current section, escalating to a
//! wider sweep when that section yields nothing, and round-robin the
//! section pointer forward on every call so the whole variable set
//! eventually gets examined.

use crate::basis::VarStatus;
use crate::pricing::{Candidate, PricingState, is_attractive};

fn section_bounds(state: &PricingState, n_total: usize) -> (usize, usize) {
    let start = (state.current_section * state.section_size).min(n_total);
    let end = (start + state.section_size).min(n_total);
    (start, end)
}

fn scan_range(var_status: &[VarStatus], dj: &[f64], tau: f64, start: usize, end: usize) -> Vec<Candidate> {
    let mut out = Vec::new();
    for j in start..end {
        if is_attractive(var_status[j], dj[j], tau) {
            out.push(Candidate { var: j, score: dj[j].abs() });
        }
    }
    out
}

/// Scan the current section; if empty, escalate one section at a time
/// (wrapping) until either a candidate is found or every section has
/// been tried. Advances `current_section` after the call regardless of
/// outcome.
pub fn scan_partial(state: &mut PricingState, var_status: &[VarStatus], dj: &[f64], tau: f64) -> Vec<Candidate> {
    let n_total = var_status.len();
    let (start, end) = section_bounds(state, n_total);
    let mut candidates = scan_range(var_status, dj, tau, start, end);

    if candidates.is_empty() {
        for step in 1..state.num_sections {
            let section = (state.current_section + step) % state.num_sections;
            let s = (section * state.section_size).min(n_total);
            let e = (s + state.section_size).min(n_total);
            candidates = scan_range(var_status, dj, tau, s, e);
            if !candidates.is_empty() {
                break;
            }
        }
    }

    state.advance_section();
    candidates
}

/// Full sweep across every section, ignoring section state entirely —
/// the partial-pricing half of `step2`'s two-phase completion.
pub fn scan_full_sweep(var_status: &[VarStatus], dj: &[f64], tau: f64) -> Vec<Candidate> {
    scan_range(var_status, dj, tau, 0, var_status.len())
}
