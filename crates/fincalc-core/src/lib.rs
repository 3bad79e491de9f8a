pub mod arithmetic;
pub mod error;
pub mod growth;
pub mod loan;
pub mod mortgage;
pub mod normalize;
pub mod types;

pub use error::FincalcError;
pub use types::*;

/// Standard result type for all fincalc validation operations
pub type FincalcResult<T> = Result<T, FincalcError>;
