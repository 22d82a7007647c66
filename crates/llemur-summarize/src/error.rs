use crate::token::Position;
use thiserror::Error;

/// Failure of the lexical stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("EOF in multi-line string starting at {0}")]
    UnterminatedString(Position),

    #[error("EOF in multi-line statement ({0})")]
    UnterminatedStatement(Position),

    #[error("unindent does not match any outer indentation level (line {line})")]
    InconsistentDedent { line: usize },
}

/// Failure of the structural stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to load Python grammar: {0}")]
    Grammar(String),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("{message} (line {line}, column {column})")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Syntax error at a tree-sitter point (0-based row and byte column)
    pub(crate) fn at(message: impl Into<String>, point: tree_sitter::Point) -> Self {
        ParseError::Syntax {
            message: message.into(),
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

/// Any failure while summarizing one file
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SummarizeResult<T> = Result<T, SummarizeError>;
