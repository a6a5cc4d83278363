// src/error.rs

use num::BigUint;

/// Errors raised while searching for, verifying or compiling addition chains.
///
/// Every failure is deterministic for a given input, so nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Malformed script line, unknown identifier or unsupported construct.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("chain does not produce {target}")]
    NotProduced { target: BigUint },

    #[error("invalid chain at position {position}: {reason}")]
    InvalidChain { position: usize, reason: String },

    /// The primitive dictionary rewrite changed the value of the sum.
    #[error("dictionary reduction is inconsistent: expected {expected}, got {actual}")]
    ReductionInconsistency { expected: BigUint, actual: BigUint },

    #[error("strategy {strategy} proposed no candidates for {n}")]
    EmptyCandidateSet { strategy: String, n: BigUint },

    #[error("invalid target {target}: targets must be positive")]
    InvalidTarget { target: BigUint },

    #[error("operand [{operand}] is not defined before position {position}")]
    OperandOutOfRange { operand: usize, position: usize },

    #[error("shift at position {position} must have a positive amount")]
    InvalidShift { position: usize },

    #[error("run lengths are too large to build a runs chain")]
    RunLengthOverflow,

    #[error("no algorithm found a chain for {target}")]
    NoChainFound { target: BigUint },

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ChainError>;
