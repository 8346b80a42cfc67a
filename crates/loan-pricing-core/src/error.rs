use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Invalid credit score: {0} is outside the 300-850 range")]
    InvalidCreditScore(u32),

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Underwriting policy error: {0}")]
    PolicyError(String),
}
