//! The iteration driver: `solve_lp` ties matrix, basis, pricing, ratio
//! test, and step into the setup → crash → loop → refine → cleanup →
//! extract pipeline of §4.5.

use crate::basis::{BasisState, VarStatus, btran, ftran, unit_vector};
use crate::model::{Callback, ModelView, Sense, SimplexConfig, SolutionSink, Status, WhereCode};
use crate::numeric::dot_dense;
use crate::perturb::PerturbationState;
use crate::pricing::{Invalidate, PricingState, PricingStrategy, is_attractive, scan, step2, update_after_pivot};
use crate::ratio_test::{RatioTestOutcome, harris_ratio_test};
use crate::step::{apply_bound_flip, apply_pivot, recompute_reduced_costs};

/// How many consecutive near-zero-step pivots are tolerated before
/// perturbation kicks in.
const STALL_THRESHOLD: usize = 50;
/// FTRAN-work growth factor over the post-refactor baseline that forces
/// a fresh refactor (the deterministic proxy for "FTRAN time", see
/// `BasisState::needs_refactor`).
const FTRAN_GROWTH_FACTOR: f64 = 10.0;

/// Run a complete solve against a read-only model view and environment,
/// returning a populated `SolutionSink`. `strategy_hint` overrides the
/// size-based pricing strategy selection of §4.3; pass `None` to let the
/// driver decide. `callback` is polled once per iteration (§5/§6); a
/// `true` return requests cooperative cancellation, surfaced as
/// `Status::IterationLimit` per §5's "iteration-limit-like status".
pub fn solve_lp(
    model: &ModelView,
    env: &SimplexConfig,
    strategy_hint: Option<PricingStrategy>,
    mut callback: Option<&mut Callback>,
) -> SolutionSink {
    let mut env = *env;
    env.validate();

    let n = model.n;
    let m = model.m;

    if let Some(cb) = callback.as_deref_mut() {
        cb(WhereCode::PreSolve);
    }

    if n == 0 {
        let mut sink = SolutionSink::empty(0, m);
        sink.status = Status::Optimal;
        return sink;
    }

    let tau_feas = env.tolerances.feasibility;
    let tau_opt = env.tolerances.optimality;
    let tau_pivot = env.tolerances.pivot;
    let zero_tol = env.tolerances.zero;
    let infinity = env.tolerances.infinity;

    for j in 0..n {
        if model.lb[j] > model.ub[j] + tau_feas {
            let mut sink = SolutionSink::empty(n, m);
            sink.status = Status::Infeasible;
            return sink;
        }
    }

    if m == 0 {
        return solve_unconstrained(model, tau_opt, infinity);
    }

    let n_total = n + m;
    let mut work_lb = vec![0.0; n_total];
    let mut work_ub = vec![0.0; n_total];
    work_lb[..n].copy_from_slice(model.lb);
    work_ub[..n].copy_from_slice(model.ub);
    for i in 0..m {
        let (lb_s, ub_s) = match model.sense[i] {
            Sense::Le => (0.0, infinity),
            Sense::Ge => (-infinity, 0.0),
            Sense::Eq => (0.0, 0.0),
        };
        work_lb[n + i] = lb_s;
        work_ub[n + i] = ub_s;
    }
    let mut work_obj = vec![0.0; n_total];
    work_obj[..n].copy_from_slice(model.c);

    let mut work_x = vec![0.0; n_total];
    let mut var_status = vec![VarStatus::AtLower; n_total];
    for j in 0..n {
        if work_lb[j] > -infinity {
            work_x[j] = work_lb[j];
            var_status[j] = VarStatus::AtLower;
        } else if work_ub[j] < infinity {
            work_x[j] = work_ub[j];
            var_status[j] = VarStatus::AtUpper;
        } else {
            work_x[j] = 0.0;
            var_status[j] = VarStatus::Free;
        }
    }

    let mut activity = vec![0.0; m];
    model.a.matvec(&work_x[..n], &mut activity, true);
    for i in 0..m {
        work_x[n + i] = model.rhs[i] - activity[i];
    }

    let mut basis = BasisState::new(m, n_total);
    for i in 0..m {
        basis.basic_vars[i] = n + i;
        var_status[n + i] = VarStatus::Basic(i);
    }
    basis.var_status = var_status;

    let infeasible_at_start = (0..m).any(|i| {
        let v = n + i;
        work_x[v] < work_lb[v] - tau_feas || work_x[v] > work_ub[v] + tau_feas
    });
    let mut phase: u8 = if infeasible_at_start { 1 } else { 2 };

    let strategy = PricingState::select_strategy(n, strategy_hint);
    let mut pricing_state = PricingState::new(strategy, n_total);

    let mut perturbation = PerturbationState::new();
    let mut stall_counter = 0usize;
    let mut numeric_retry_used = false;
    let mut obj_value = 0.0_f64;
    let mut pi = vec![0.0; m];
    let mut status;

    loop {
        if basis.iteration >= env.limits.max_iterations {
            status = Status::IterationLimit;
            break;
        }
        if let Some(cb) = callback.as_deref_mut() {
            if cb(WhereCode::Polling) {
                status = Status::IterationLimit;
                break;
            }
        }

        let (cost_vec, ratio_lb, ratio_ub) = if phase == 1 {
            let (cost, phase1_obj) = phase1_objective(&work_x, &work_lb, &work_ub, &basis.basic_vars, tau_feas);
            if phase1_obj <= tau_feas {
                phase = 2;
                obj_value = dot_dense(&work_obj, &work_x);
                continue;
            }
            let (eff_lb, eff_ub) = phase1_effective_bounds(&work_x, &work_lb, &work_ub, &basis.basic_vars, tau_feas);
            (cost, eff_lb, eff_ub)
        } else {
            (work_obj.clone(), work_lb.clone(), work_ub.clone())
        };

        let (mut dj, pi_now) = recompute_reduced_costs(model.a, &basis, &cost_vec);
        pi = pi_now;

        let mut candidates = scan(&mut pricing_state, &basis.var_status, &dj, tau_opt, 1);
        if candidates.is_empty() {
            candidates = step2(&mut pricing_state, &basis.var_status, &dj, tau_opt);
        }
        if candidates.is_empty() {
            if phase == 1 {
                status = Status::Infeasible;
            } else {
                status = Status::Optimal;
            }
            break;
        }

        let entering = candidates[0].var;
        let entering_status = basis.var_status[entering];
        debug_assert!(is_attractive(entering_status, dj[entering], tau_opt));

        let mut column = vec![0.0; m];
        if entering < n {
            let (rows, vals) = model.a.col(entering);
            for (&r, &v) in rows.iter().zip(vals.iter()) {
                column[r] = v;
            }
        } else {
            column[entering - n] = 1.0;
        }
        let touched = ftran(&basis.eta_chain, &mut column);
        basis.record_ftran_work(touched);

        let entering_lb = work_lb[entering];
        let entering_ub = work_ub[entering];
        let outcome = harris_ratio_test(
            &column,
            &work_x,
            &ratio_lb,
            &ratio_ub,
            &basis.basic_vars,
            entering_lb,
            entering_ub,
            tau_feas,
            infinity,
        );

        let mut theta_applied = 0.0;
        match outcome {
            RatioTestOutcome::Unbounded => {
                status = if phase == 1 { Status::NumericDifficulty } else { Status::Unbounded };
                break;
            }
            RatioTestOutcome::BoundFlip { theta } => {
                let entering_from_upper = matches!(entering_status, VarStatus::AtUpper);
                let new_value = if entering_from_upper { entering_lb } else { entering_ub };
                apply_bound_flip(
                    &basis.basic_vars,
                    &column,
                    &mut work_x,
                    entering,
                    new_value,
                    entering_from_upper,
                    dj[entering],
                    theta,
                    &mut obj_value,
                );
                basis.var_status[entering] = if entering_from_upper { VarStatus::AtLower } else { VarStatus::AtUpper };
                pricing_state.invalidate(Invalidate::Candidates);
                theta_applied = theta;
                numeric_retry_used = false;
            }
            RatioTestOutcome::Pivot { row, pivot_element, theta } => {
                if pivot_element.abs() < tau_pivot {
                    if numeric_retry_used {
                        status = Status::NumericDifficulty;
                        break;
                    }
                    numeric_retry_used = true;
                    basis.refactor();
                    continue;
                }
                numeric_retry_used = false;

                let entering_from_upper = matches!(entering_status, VarStatus::AtUpper);
                let leaving_var = basis.basic_vars[row];
                let leaving_final_value = work_x[leaving_var] - theta * pivot_element;
                let leaving_status = if (leaving_final_value - work_lb[leaving_var]).abs()
                    <= (leaving_final_value - work_ub[leaving_var]).abs()
                {
                    VarStatus::AtLower
                } else {
                    VarStatus::AtUpper
                };
                let d_entering = dj[entering];

                if matches!(strategy, PricingStrategy::SteepestEdge | PricingStrategy::Devex) {
                    // BTRAN against the pivot row of the *pre-pivot* basis inverse;
                    // must run before `apply_pivot` appends the new eta.
                    let e_row = unit_vector(m, row);
                    let (alpha_row, _touched) = btran(&basis.eta_chain, &e_row);
                    update_after_pivot(
                        model.a,
                        &alpha_row,
                        &alpha_row,
                        entering,
                        leaving_var,
                        d_entering,
                        pivot_element,
                        &basis.var_status,
                        &mut dj,
                        &mut pricing_state.weights,
                        strategy,
                    );
                }

                match apply_pivot(
                    &mut basis,
                    entering,
                    entering_from_upper,
                    row,
                    leaving_status,
                    &column,
                    theta,
                    d_entering,
                    &mut work_x,
                    &work_lb,
                    &work_ub,
                    &mut obj_value,
                    tau_pivot,
                ) {
                    Ok(_leaving_var) => {
                        pricing_state.invalidate(Invalidate::Candidates);
                        theta_applied = theta;
                    }
                    Err(_) => {
                        status = Status::NumericDifficulty;
                        break;
                    }
                }
            }
        }

        if theta_applied.abs() < tau_feas {
            stall_counter += 1;
        } else {
            stall_counter = 0;
        }
        if stall_counter >= STALL_THRESHOLD && !perturbation.is_applied() {
            perturbation.apply(&mut work_lb, &mut work_ub, tau_feas, infinity);
        }

        if basis.needs_refactor(env.limits.refactor_interval, env.limits.max_eta_memory_bytes, FTRAN_GROWTH_FACTOR) {
            basis.refactor();
        }
    }

    if matches!(status, Status::Optimal) {
        if perturbation.is_applied() {
            perturbation.unperturb(&mut work_lb, &mut work_ub);
        }
        refine(&mut work_x, &work_lb, &work_ub, tau_feas, zero_tol);
        obj_value = dot_dense(&work_obj, &work_x);
        for p in pi.iter_mut() {
            if p.abs() < zero_tol {
                *p = 0.0;
            }
        }
    }

    if let Some(cb) = callback.as_deref_mut() {
        cb(WhereCode::PostSolve);
    }

    SolutionSink {
        solution: work_x[..n].to_vec(),
        pi,
        obj_val: obj_value,
        status,
    }
}

/// m=0 boundary (§8): no constraints, so each variable independently
/// settles at whichever bound is best for its own cost coefficient.
fn solve_unconstrained(model: &ModelView, tau_opt: f64, infinity: f64) -> SolutionSink {
    let n = model.n;
    let mut solution = vec![0.0; n];
    let mut obj_val = 0.0;
    for j in 0..n {
        let c = model.c[j];
        let (lb, ub) = (model.lb[j], model.ub[j]);
        let x = if c > tau_opt {
            if lb <= -infinity {
                return SolutionSink { solution, pi: vec![], obj_val: 0.0, status: Status::Unbounded };
            }
            lb
        } else if c < -tau_opt {
            if ub >= infinity {
                return SolutionSink { solution, pi: vec![], obj_val: 0.0, status: Status::Unbounded };
            }
            ub
        } else if lb > -infinity {
            lb
        } else if ub < infinity {
            ub
        } else {
            0.0
        };
        solution[j] = x;
        obj_val += c * x;
    }
    SolutionSink { solution, pi: vec![], obj_val, status: Status::Optimal }
}

/// Sum-of-infeasibilities composite objective (§4.5's Phase I), recomputed
/// from the *current* basic values each call: a basic variable sitting
/// outside its bound contributes `±1` to the cost vector (driving it back
/// toward feasibility) and its violation magnitude to the objective.
fn phase1_objective(x: &[f64], lb: &[f64], ub: &[f64], basic_vars: &[usize], tau: f64) -> (Vec<f64>, f64) {
    let mut cost = vec![0.0; x.len()];
    let mut obj = 0.0;
    for &v in basic_vars {
        if x[v] > ub[v] + tau {
            cost[v] = 1.0;
            obj += x[v] - ub[v];
        } else if x[v] < lb[v] - tau {
            cost[v] = -1.0;
            obj += lb[v] - x[v];
        }
    }
    (cost, obj)
}

/// Effective bounds used by the Phase I ratio test in place of the real
/// ones: a basic variable currently outside its real bound would
/// otherwise look unblocked in the direction that cures its own
/// infeasibility (its real far bound may be infinite), which would make
/// the ratio test wrongly report `Unbounded` instead of stopping exactly
/// where the variable becomes feasible. Overriding the near bound to the
/// violated one gives the ratio test a finite, correct blocking point;
/// the far (already-violated) bound is left as-is, which correctly
/// forces a near-zero step if the chosen direction would worsen the
/// violation further.
fn phase1_effective_bounds(x: &[f64], lb: &[f64], ub: &[f64], basic_vars: &[usize], tau: f64) -> (Vec<f64>, Vec<f64>) {
    let mut eff_lb = lb.to_vec();
    let mut eff_ub = ub.to_vec();
    for &v in basic_vars {
        if x[v] > ub[v] + tau {
            eff_lb[v] = ub[v];
        } else if x[v] < lb[v] - tau {
            eff_ub[v] = lb[v];
        }
    }
    (eff_lb, eff_ub)
}

/// Snap near-bound values to the exact bound and zero out numerical
/// dust, per §4.5's refinement pass.
fn refine(x: &mut [f64], lb: &[f64], ub: &[f64], tau: f64, zero_tol: f64) {
    for j in 0..x.len() {
        if (x[j] - lb[j]).abs() < tau {
            x[j] = lb[j];
        } else if (x[j] - ub[j]).abs() < tau {
            x[j] = ub[j];
        }
        if x[j].abs() < zero_tol {
            x[j] = 0.0;
        }
    }
}
