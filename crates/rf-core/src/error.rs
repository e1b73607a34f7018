/// Errors produced by the rf-synth workspace.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    #[error("unsupported configuration: {reason}")]
    Configuration { reason: String },

    #[error("load cannot be matched: {reason}")]
    UnmatchableLoad { reason: String },

    #[error("numerical convergence failed after {iterations} iterations in {context}")]
    NonConvergence {
        context: &'static str,
        iterations: usize,
    },

    #[error("divisor collapse in {context}")]
    NumericOverflow { context: &'static str },
}

impl RfError {
    /// Build a configuration error from anything printable.
    pub fn configuration(reason: impl Into<String>) -> Self {
        RfError::Configuration {
            reason: reason.into(),
        }
    }

    /// Build an unmatchable-load error from anything printable.
    pub fn unmatchable(reason: impl Into<String>) -> Self {
        RfError::UnmatchableLoad {
            reason: reason.into(),
        }
    }
}

/// Convenience result type for rf-synth operations.
pub type RfResult<T> = Result<T, RfError>;
