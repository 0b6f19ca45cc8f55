use core::fmt;
use std::io;

use thiserror::Error;

use crate::scanner::Token;

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(Token),
    Factor,
    Action,
    Comparison,
    ElsePart,
    ValidToken,
    FiniteNumber,
    /// Expressions and blocks may nest this many levels deep.
    Nesting(usize),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => write!(f, "'{}'", token),
            Self::Factor => write!(f, "factor"),
            Self::Action => write!(f, "turtle action statement"),
            Self::Comparison => write!(f, "comparison"),
            Self::ElsePart => write!(f, "'ELSIF', 'ELSE' or 'FI'"),
            Self::ValidToken => write!(f, "valid token"),
            Self::FiniteNumber => write!(f, "number in range"),
            Self::Nesting(limit) => write!(f, "at most {} levels of nesting", limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: Unexpected '{found}', expecting {expected}")]
pub struct SyntaxError {
    pub line: usize,
    pub found: String,
    pub expected: Expected,
}

impl SyntaxError {
    pub fn new(line: usize, found: impl Into<String>, expected: Expected) -> Self {
        Self { line, found: found.into(), expected }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
    #[error("Failed to write turtle command: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum TurtleError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
