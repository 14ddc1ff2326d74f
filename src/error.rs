//! DeskAide Error Types
//!
//! Centralized error handling for the assistant core.

use thiserror::Error;

/// Rejections and failures from the calculator pipeline.
///
/// Validation variants identify which rule fired; their messages are shown
/// to the user verbatim and nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("expression contains invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("function calls are not allowed")]
    DisallowedCall,

    #[error("disallowed expression: {0}")]
    DisallowedNode(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),

    #[error("negative shift count")]
    NegativeShift,

    #[error("unsupported operand for '{0}'")]
    UnsupportedOperand(&'static str),

    #[error("expression too long ({0} bytes)")]
    TooLong(usize),

    #[error("expression nested too deeply")]
    TooDeep,
}

/// Failures from the remote summarization service.
///
/// Every variant triggers fallback to the local summarizer; none of these
/// ever reaches the end user as an error.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("OPENAI_API_KEY is not set")]
    MissingCredential,

    #[error("summarization service returned HTTP {0}")]
    Status(u16),

    #[error("malformed summarization response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Result type alias for calculator operations
pub type EvalResult<T> = Result<T, EvalError>;
