//! The simplex step proper: apply a ratio-test pivot to the working
//! values, the basis header, and the dual price / reduced-cost vectors.

use crate::basis::{BasisError, BasisState, VarStatus, btran};
use crate::matrix::CscMatrix;

/// Apply one pivot: update basic values, move the entering variable to
/// its new value, append the eta, and fold the step into the running
/// objective (§4.4's "simplex step"). Returns the variable that left the
/// basis.
///
/// `entering_from_upper` selects which of the entering variable's two
/// bounds it was sitting at before the step (`x_e ← lb_e + θ` vs
/// `x_e ← ub_e − θ`).
#[allow(clippy::too_many_arguments)]
pub fn apply_pivot(
    basis: &mut BasisState,
    entering_var: usize,
    entering_from_upper: bool,
    leaving_row: usize,
    leaving_status: VarStatus,
    pivot_column: &[f64],
    theta: f64,
    d_entering: f64,
    x: &mut [f64],
    lb: &[f64],
    ub: &[f64],
    obj_value: &mut f64,
    pivot_tolerance: f64,
) -> Result<usize, BasisError> {
    for (i, &di) in pivot_column.iter().enumerate() {
        let v = basis.basic_vars[i];
        x[v] -= theta * di;
    }
    x[entering_var] = if entering_from_upper {
        ub[entering_var] - theta
    } else {
        lb[entering_var] + theta
    };

    let leaving_var = basis.basic_vars[leaving_row];
    basis.append_eta(leaving_row, entering_var, leaving_var, leaving_status, pivot_column, pivot_tolerance)?;
    *obj_value += d_entering * theta;
    Ok(leaving_var)
}

/// Apply a bound flip: the entering variable crosses its own range
/// without any basis change, but every basic variable still moves along
/// the same pivot column a real pivot would use — skipping the *basis*
/// change isn't skipping the primal update. Updates every basic value,
/// the entering variable's value, and the running objective; the caller
/// is responsible for toggling `var_status`.
///
/// `entering_from_upper` selects the flip direction: flipping away from
/// the upper bound moves the entering variable down by `theta`, the
/// opposite sign of the from-lower case, so the objective delta flips
/// sign with it.
#[allow(clippy::too_many_arguments)]
pub fn apply_bound_flip(
    basic_vars: &[usize],
    pivot_column: &[f64],
    x: &mut [f64],
    entering_var: usize,
    new_value: f64,
    entering_from_upper: bool,
    d_entering: f64,
    theta: f64,
    obj_value: &mut f64,
) {
    for (i, &di) in pivot_column.iter().enumerate() {
        let v = basic_vars[i];
        x[v] -= theta * di;
    }
    x[entering_var] = new_value;
    *obj_value += if entering_from_upper { -d_entering * theta } else { d_entering * theta };
}

/// Recompute the dual prices and every nonbasic reduced cost from
/// scratch: `π` via BTRAN against the basic cost vector, then
/// `dⱼ = cⱼ − πᵀAⱼ` for structural columns and `dⱼ = cⱼ − π_{j-n}` for
/// the implicit identity columns of artificial variables. Returns
/// `(dj, pi)`, both freshly allocated.
pub fn recompute_reduced_costs(a: &CscMatrix, basis: &BasisState, work_obj: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = a.dim.ncols;
    let m = a.dim.nrows;
    let c_b: Vec<f64> = basis.basic_vars.iter().map(|&v| work_obj[v]).collect();
    let (pi, _touched) = btran(&basis.eta_chain, &c_b);

    let mut dj = vec![0.0; n + m];
    for j in 0..n {
        dj[j] = work_obj[j] - a.col_dot_dense(j, &pi);
    }
    for i in 0..m {
        dj[n + i] = work_obj[n + i] - pi[i];
    }
    (dj, pi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::builder::MatrixBuilder;

    fn identity_basis(m: usize, n: usize) -> BasisState {
        let mut b = BasisState::new(m, n + m);
        for i in 0..m {
            b.basic_vars[i] = n + i;
            b.var_status[n + i] = VarStatus::Basic(i);
        }
        b
    }

    #[test]
    fn apply_pivot_updates_values_and_basis_header() {
        let mut basis = identity_basis(2, 1);
        let mut x = vec![0.0, 5.0, 5.0]; // var0 (structural), var1/var2 (slacks)
        let lb = vec![0.0, 0.0, 0.0];
        let ub = vec![10.0, 10.0, 10.0];
        let mut obj = 0.0;
        let pivot_column = [1.0, 0.5];

        let left = apply_pivot(
            &mut basis, 0, false, 0, VarStatus::AtLower, &pivot_column, 2.0, -3.0, &mut x, &lb,
            &ub, &mut obj, 1e-10,
        )
        .unwrap();

        assert_eq!(left, 1); // slack for row 0 left
        assert_eq!(x[0], 2.0); // entering var moved by theta
        assert_eq!(x[1], 5.0 - 2.0 * 1.0);
        assert_eq!(x[2], 5.0 - 2.0 * 0.5);
        assert_eq!(obj, -6.0);
        assert_eq!(basis.basic_vars[0], 0);
        assert_eq!(basis.var_status[0], VarStatus::Basic(0));
        assert_eq!(basis.var_status[1], VarStatus::AtLower);
    }

    #[test]
    fn bound_flip_from_lower_updates_basics_and_objective() {
        let basic_vars = [1usize, 2usize];
        let pivot_column = [1.0, 0.5];
        let mut x = vec![0.0, 5.0, 5.0];
        let mut obj = 0.0;

        apply_bound_flip(&basic_vars, &pivot_column, &mut x, 0, 3.0, false, -2.0, 3.0, &mut obj);

        assert_eq!(x[0], 3.0);
        assert_eq!(x[1], 5.0 - 3.0 * 1.0);
        assert_eq!(x[2], 5.0 - 3.0 * 0.5);
        assert_eq!(obj, -6.0);
    }

    #[test]
    fn bound_flip_from_upper_negates_objective_delta() {
        let basic_vars = [1usize, 2usize];
        let pivot_column = [1.0, 0.5];
        let mut x = vec![10.0, 5.0, 5.0];
        let mut obj = 0.0;

        apply_bound_flip(&basic_vars, &pivot_column, &mut x, 0, 7.0, true, -2.0, 3.0, &mut obj);

        assert_eq!(x[0], 7.0);
        assert_eq!(x[1], 5.0 - 3.0 * 1.0);
        assert_eq!(x[2], 5.0 - 3.0 * 0.5);
        assert_eq!(obj, 6.0);
    }

    #[test]
    fn recompute_reduced_costs_matches_hand_computation() {
        // A = [[1, 0], [0, 1]], basis = identity (slacks basic), c = (−1, −2, 0, 0)
        let mut b = MatrixBuilder::new(2, 2);
        b.push(0, 0, 1.0).unwrap();
        b.push(1, 1, 1.0).unwrap();
        let a = b.build_csc().unwrap();

        let basis = identity_basis(2, 2);
        let work_obj = [-1.0, -2.0, 0.0, 0.0];

        let (dj, pi) = recompute_reduced_costs(&a, &basis, &work_obj);
        assert_eq!(pi, vec![0.0, 0.0]);
        assert_eq!(dj, vec![-1.0, -2.0, 0.0, 0.0]);
    }
}
