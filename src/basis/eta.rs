use crate::basis::state::VarStatus;

/// Tag distinguishing an elementary pivot update from a refactorization
/// marker, per the data model's "type tag (refactor vs pivot)". In this
/// implementation refactorization resets the chain to empty rather than
/// inserting a marker eta (see `BasisState::refactor`), so `Refactor`
/// never actually appears in a live chain today; the variant is kept so
/// a future non-identity refactorization (real LU) has somewhere to
/// record the reset without changing the chain's element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtaKind {
    Refactor,
    Pivot,
}

/// A single elementary transformation in the Product-Form-of-Inverse
/// chain: `B_new = B_old · E`. Represents one successful pivot.
#[derive(Debug, Clone)]
pub struct Eta {
    pub kind: EtaKind,
    /// Row of the basis the pivot happened in.
    pub pivot_row: usize,
    /// Variable that entered the basis at `pivot_row`.
    pub pivot_var: usize,
    /// Variable that left the basis from `pivot_row`.
    pub leaving_var: usize,
    /// Nonzero (row, value) pairs of the pivot column, excluding
    /// `pivot_row` itself (that entry is `pivot_element`).
    pub entries: Vec<(usize, f64)>,
    pub pivot_element: f64,
    /// Status the leaving variable took up after the pivot (which bound
    /// it came to rest on), plumbed through from the ratio test's
    /// blocking-bound decision rather than hardcoded to "at lower".
    pub leaving_status: VarStatus,
}

impl Eta {
    /// Approximate resident memory in bytes: a fixed header plus one
    /// `(usize, f64)` pair per stored nonzero, used to drive the
    /// `max_eta_memory` refactor trigger.
    pub fn memory_bytes(&self) -> usize {
        const HEADER: usize = std::mem::size_of::<usize>() * 4 + std::mem::size_of::<f64>() * 2;
        HEADER + self.entries.len() * (std::mem::size_of::<usize>() + std::mem::size_of::<f64>())
    }
}
