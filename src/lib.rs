//! A sparse, revised primal simplex engine with product-form-of-inverse
//! basis factorization.
//!
//! The crate root re-exports the §6 external-interfaces boundary
//! (`ModelView`, `SimplexConfig`, `Status`, `SolutionSink`) and the single
//! entry point, `solve_lp`. Everything beneath `model`, `matrix`, `basis`,
//! `pricing`, `ratio_test`, `step`, `perturb`, and `driver` is the engine
//! internals; most callers only need this module.

pub mod basis;
pub mod driver;
pub mod error;
pub mod matrix;
pub mod model;
pub mod numeric;
pub mod perturb;
pub mod pricing;
pub mod sort;
pub mod step;

pub use driver::solve_lp;
pub use error::{ErrorKind, SimplexError};
pub use model::{
    Callback, Limits, ModelView, Sense, SimplexConfig, SolutionSink, Status, Tolerances,
    WhereCode,
};
pub use pricing::PricingStrategy;

/// The outcome of a complete `solve_lp` call: a populated `SolutionSink`
/// together with the pricing strategy actually used (useful when the
/// caller passed `None` and let §4.3's size-based rule decide).
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub sink: SolutionSink,
    pub strategy_used: PricingStrategy,
}

/// Convenience wrapper around `solve_lp` that also reports which pricing
/// strategy was selected, for callers who passed `strategy_hint = None`
/// and want to know what the size-based rule picked.
pub fn solve(
    model: &ModelView,
    env: &SimplexConfig,
    strategy_hint: Option<PricingStrategy>,
) -> SolveOutcome {
    let strategy_used = pricing::PricingState::select_strategy(model.n, strategy_hint);
    let sink = solve_lp(model, env, Some(strategy_used), None);
    SolveOutcome { sink, strategy_used }
}
