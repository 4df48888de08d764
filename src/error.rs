use thiserror::Error;

/// Errors that can occur while reading or evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BelError {
    /// Symbol lookup failed through the whole frame chain.
    #[error("Error: unbound variable '{0}'")]
    Unbound(String),

    /// An expression or special-form operand list has the wrong shape.
    #[error("Error: malformed expression: {0}")]
    Malformed(String),

    /// Too few arguments for a fixed-arity parameter list.
    #[error("Error: too few arguments")]
    UnderArgs,

    /// Too many arguments for a fixed-arity parameter list.
    #[error("Error: too many arguments")]
    OverArgs,

    /// An operand had the wrong kind of value (car of an integer, etc).
    #[error("Type error: {0}")]
    TypeError(String),

    /// Operator position evaluated to something that is not a procedure.
    #[error("Error: not a procedure: {0}")]
    NotAProcedure(String),

    /// Reader error.
    #[error("Read error: {0}")]
    ReadError(String),

    /// Heap capacity exceeded.
    #[error("Error: heap capacity exceeded")]
    HeapOverflow,

    /// Fuel (step counter) exhausted.
    #[error("Error: step limit exceeded (possible infinite loop)")]
    FuelExhausted,

    /// Internal interpreter error (should not happen in correct code).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BelError {
    /// Fatal errors mean the evaluator itself is inconsistent; a front end
    /// should stop rather than report and continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BelError::Internal(_))
    }

    /// True for the two arity variants.
    pub fn is_arity(&self) -> bool {
        matches!(self, BelError::UnderArgs | BelError::OverArgs)
    }
}

pub type BelResult<T> = Result<T, BelError>;
