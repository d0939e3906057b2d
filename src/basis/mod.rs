pub mod error;
pub mod eta;
pub mod solve;
pub mod state;

pub use error::BasisError;
pub use eta::{Eta, EtaKind};
pub use solve::{btran, ftran, unit_vector};
pub use state::{BasisState, VarStatus};
