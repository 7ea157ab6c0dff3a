//! Error types for rate solving, plan construction and portfolio aggregation

use thiserror::Error;

/// Result alias used throughout the crate
pub type XYResult<T> = Result<T, XYError>;

/// Errors raised by the annuity solvers, plan builders and the portfolio
#[derive(Error, Debug)]
pub enum XYError {
    /// The annuity rate/payment solver did not converge
    #[error("Annuity rate solve failed after {iterations} iterations (residual: {residual:.2e})")]
    RateSolveFailed {
        iterations: u32,
        residual: f64,
    },

    /// No real periodic rate zeroes the NPV of the cash flows
    #[error("IRR undefined: {reason}")]
    IrrUndefined { reason: String },

    /// A call was made with arguments or in a state it does not accept
    #[error("Precondition violated: {reason}")]
    PreconditionViolation { reason: String },

    /// A plan book row could not be turned into a plan
    #[error("Invalid plan book row {row}: {reason}")]
    InvalidInput { row: usize, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl XYError {
    pub fn rate_solve_failed(iterations: u32, residual: f64) -> Self {
        Self::RateSolveFailed { iterations, residual }
    }

    pub fn irr_undefined(reason: impl Into<String>) -> Self {
        Self::IrrUndefined { reason: reason.into() }
    }

    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionViolation { reason: reason.into() }
    }
}
