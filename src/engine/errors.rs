//! Error types for step generation
//!
//! Generation never panics and never leaks parser internals: every failure
//! mode maps to a [`GenerateError`] variant whose `Display` form is a single
//! readable line suitable for the console collaborator.

use std::fmt;

/// Errors that can occur while generating a step sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The source failed to lex or parse. Deliberately generic: parser
    /// internals are never echoed to end users.
    Syntax,

    /// Source text exceeds the accepted length
    CodeTooLong { length: usize, limit: usize },

    /// The generated sequence exceeded the step ceiling
    StepLimitExceeded { limit: usize },

    /// More microtasks were processed than the per-run ceiling allows
    MicrotaskLimitExceeded { limit: usize },

    /// Unexpected failure while walking a valid AST
    Analysis { message: String },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Syntax => write!(f, "Syntax error in code"),
            GenerateError::CodeTooLong { length, limit } => {
                write!(
                    f,
                    "Code exceeds maximum length ({} characters, limit is {})",
                    length, limit
                )
            }
            GenerateError::StepLimitExceeded { limit } => {
                write!(f, "Code complexity exceeds limit ({} steps)", limit)
            }
            GenerateError::MicrotaskLimitExceeded { limit } => {
                write!(f, "Microtask limit exceeded ({} processed)", limit)
            }
            GenerateError::Analysis { message } => {
                write!(f, "Error analyzing code: {}", message)
            }
        }
    }
}

impl std::error::Error for GenerateError {}
