//! §6 external interfaces: the narrow boundary through which the core
//! is invoked. `ModelView`/`EnvironmentView` are read-only for the
//! duration of a solve; `SolutionSink` is write-only, populated once at
//! extraction.

pub mod builder;

use crate::error::SimplexError;
use crate::matrix::CscMatrix;
use crate::numeric::INFINITY;

/// Constraint relation, as read from the model (`<`, `=`, `>` in §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Eq,
    Ge,
}

impl Sense {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Sense::Le),
            '=' => Some(Sense::Eq),
            '>' => Some(Sense::Ge),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sense::Le => '<',
            Sense::Eq => '=',
            Sense::Ge => '>',
        }
    }
}

/// Read-only view of the model for the duration of a solve. The model
/// does not supply the slack/artificial extension — that's synthesized
/// internally by `driver::setup`.
pub struct ModelView<'a> {
    pub n: usize,
    pub m: usize,
    pub c: &'a [f64],
    pub lb: &'a [f64],
    pub ub: &'a [f64],
    pub a: &'a CscMatrix,
    pub rhs: &'a [f64],
    pub sense: &'a [Sense],
}

impl<'a> ModelView<'a> {
    /// Validate the §7 preconditions (length agreement, finite bounds,
    /// matrix dimensions matching `n`/`m`) before the driver touches any
    /// of these slices.
    pub fn new(
        n: usize,
        m: usize,
        c: &'a [f64],
        lb: &'a [f64],
        ub: &'a [f64],
        a: &'a CscMatrix,
        rhs: &'a [f64],
        sense: &'a [Sense],
    ) -> Result<Self, SimplexError> {
        if c.len() != n {
            return Err(SimplexError::InvalidArgument(format!(
                "c has length {} but n = {n}",
                c.len()
            )));
        }
        if lb.len() != n || ub.len() != n {
            return Err(SimplexError::InvalidArgument(format!(
                "lb/ub must have length {n}, got {}/{}",
                lb.len(),
                ub.len()
            )));
        }
        if rhs.len() != m || sense.len() != m {
            return Err(SimplexError::InvalidArgument(format!(
                "rhs/sense must have length {m}, got {}/{}",
                rhs.len(),
                sense.len()
            )));
        }
        if a.dim.nrows != m || a.dim.ncols != n {
            return Err(SimplexError::InvalidArgument(format!(
                "A is {}x{}, expected {m}x{n}",
                a.dim.nrows, a.dim.ncols
            )));
        }
        Ok(Self { n, m, c, lb, ub, a, rhs, sense })
    }

    pub fn nnz(&self) -> usize {
        self.a.nnz()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tolerances {
    pub feasibility: f64,
    pub optimality: f64,
    pub pivot: f64,
    pub zero: f64,
    pub infinity: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            feasibility: 1.0e-6,
            optimality: 1.0e-6,
            pivot: 1.0e-10,
            zero: 1.0e-12,
            infinity: INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_iterations: usize,
    pub refactor_interval: usize,
    pub max_eta_count: usize,
    pub max_eta_memory_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            refactor_interval: 100,
            max_eta_count: 10_000,
            max_eta_memory_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Environment view: tolerances, limits, and flags, read-only during a
/// solve. The termination flag is checked between iterations (never
/// mid-FTRAN, per §5's cancellation model).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplexConfig {
    pub tolerances: Tolerances,
    pub limits: Limits,
    pub verbosity: u8,
    pub output_enabled: bool,
}

impl SimplexConfig {
    /// Clamp out-of-range tolerances/limits to sane minimums, mirroring
    /// the teacher's `KluConfig::validate`.
    pub fn validate(&mut self) {
        self.tolerances.feasibility = self.tolerances.feasibility.max(1.0e-12);
        self.tolerances.optimality = self.tolerances.optimality.max(1.0e-12);
        self.tolerances.pivot = self.tolerances.pivot.max(1.0e-14);
        self.tolerances.zero = self.tolerances.zero.max(0.0);
        self.limits.max_iterations = self.limits.max_iterations.max(1);
        self.limits.refactor_interval = self.limits.refactor_interval.max(1);
        self.limits.max_eta_count = self.limits.max_eta_count.max(1);
    }
}

/// Where in the solve the callback is being polled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereCode {
    PreSolve,
    Polling,
    /// Reserved for a future MIP layer; the core never emits this today.
    MipSol,
    PostSolve,
}

/// Callback hook: returning `true` signals cancel (mirrors the "non-zero
/// return" of §6's C-shaped callback, adapted to a safe closure instead
/// of a function pointer + void user-data per the REDESIGN FLAGS §9
/// "void-pointer env/state parameters" item).
pub type Callback<'a> = dyn FnMut(WhereCode) -> bool + 'a;

/// Terminal (and in-flight) solver status. Transitions are exclusive:
/// `init -> phase1 -> phase2 -> refine -> cleanup -> done`, with
/// infeasible able to terminate directly from the end of phase1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Init,
    Phase1,
    Phase2,
    Refine,
    Cleanup,
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
    NumericDifficulty,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Status::Optimal
                | Status::Infeasible
                | Status::Unbounded
                | Status::IterationLimit
                | Status::NumericDifficulty
        )
    }
}

/// Write-only at extraction time.
#[derive(Debug, Clone)]
pub struct SolutionSink {
    pub solution: Vec<f64>,
    pub pi: Vec<f64>,
    pub obj_val: f64,
    pub status: Status,
}

impl SolutionSink {
    pub fn empty(n: usize, m: usize) -> Self {
        Self {
            solution: vec![0.0; n],
            pi: vec![0.0; m],
            obj_val: 0.0,
            status: Status::Init,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validate_clamps_out_of_range_tolerances() {
        let mut cfg = SimplexConfig {
            tolerances: Tolerances {
                feasibility: -1.0,
                optimality: 0.0,
                pivot: -5.0,
                zero: -1.0,
                infinity: INFINITY,
            },
            limits: Limits {
                max_iterations: 0,
                refactor_interval: 0,
                max_eta_count: 0,
                max_eta_memory_bytes: 0,
            },
            verbosity: 0,
            output_enabled: false,
        };
        cfg.validate();
        assert!(cfg.tolerances.feasibility > 0.0);
        assert!(cfg.tolerances.optimality > 0.0);
        assert!(cfg.tolerances.pivot > 0.0);
        assert_eq!(cfg.limits.max_iterations, 1);
        assert_eq!(cfg.limits.refactor_interval, 1);
    }

    #[test]
    fn model_view_rejects_length_mismatch() {
        use crate::matrix::builder::MatrixBuilder;
        let a = MatrixBuilder::new(1, 2).build_csc().unwrap();
        let err = ModelView::new(2, 1, &[1.0], &[0.0, 0.0], &[1.0, 1.0], &a, &[1.0], &[Sense::Le])
            .unwrap_err();
        assert!(matches!(err, SimplexError::InvalidArgument(_)));
    }

    #[test]
    fn model_view_accepts_inverted_bounds_construction_time() {
        // lb > ub is a *solve-time* boundary condition (infeasible
        // terminal, §8), not a construction-time precondition violation.
        use crate::matrix::builder::MatrixBuilder;
        let a = MatrixBuilder::new(1, 1).build_csc().unwrap();
        let view = ModelView::new(1, 1, &[1.0], &[5.0], &[0.0], &a, &[1.0], &[Sense::Le]).unwrap();
        assert!(view.lb[0] > view.ub[0]);
    }

    #[test]
    fn sense_char_roundtrip() {
        for c in ['<', '=', '>'] {
            assert_eq!(Sense::from_char(c).unwrap().as_char(), c);
        }
        assert!(Sense::from_char('?').is_none());
    }
}
