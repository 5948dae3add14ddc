//! Error taxonomy shared by the domain and simulation crates.

use thiserror::Error;

/// Errors returned by tokenomics formulas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenomicsError {
    /// An argument is outside the domain of the formula.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A history is too short for the requested computation.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations.
        required: usize,
        /// Observations supplied.
        actual: usize,
    },
}

impl TokenomicsError {
    /// Shorthand for building an [`TokenomicsError::InvalidInput`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TokenomicsError>;
