pub mod amortization;
pub mod error;
pub mod pricing;
pub mod risk;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "underwriting")]
pub mod underwriting;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use amortization::payment::amortize;
pub use error::LendingError;
pub use pricing::rate::resolve_rate;
pub use risk::scoring::evaluate_risk;
pub use types::*;

/// Standard result type for all loan-pricing operations
pub type LendingResult<T> = Result<T, LendingError>;
