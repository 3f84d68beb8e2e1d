use thiserror::Error;

// Parser over a slice of input items, returning the next position on success.
pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

// Input items that can describe themselves in error messages.
pub trait Located {
    fn found(&self) -> String;
    fn column(&self) -> usize;
}

pub type ParseResult<O> = Result<(usize, O), ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("{message}: found {found:?} at column {column}")]
    ParseError {
        message: String,
        found: String,
        column: usize,
    },
    #[error("Unexpected end of expression")]
    UnexpectedEOF,
    #[error("Tokenize error: {0}")]
    Tokenize(#[from] crate::tokenizer::token::TokenizerError),
    #[error("EOF")]
    EOF,
    #[error("Unexpected {found:?} at column {column}")]
    Unexpected { found: String, column: usize },
    #[error("No alternative")]
    NoAlternative,
    #[error("Fail: {0}")]
    Fail(String),
    #[error("{message}: {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}

impl ParseError {
    /// Fatal errors stop backtracking in `choice` and `optional`.
    pub fn is_fatal(&self) -> bool {
        match self {
            ParseError::ParseError { .. } | ParseError::UnexpectedEOF | ParseError::Tokenize(_) => {
                true
            }
            ParseError::WithContext { inner, .. } => inner.is_fatal(),
            ParseError::EOF
            | ParseError::Unexpected { .. }
            | ParseError::NoAlternative
            | ParseError::Fail(_) => false,
        }
    }

    /// Converts a recoverable error into its fatal counterpart.
    pub fn into_fatal(self) -> ParseError {
        match self {
            ParseError::EOF => ParseError::UnexpectedEOF,
            ParseError::Unexpected { found, column } => ParseError::ParseError {
                message: "unexpected token".to_string(),
                found,
                column,
            },
            ParseError::NoAlternative => ParseError::ParseError {
                message: "no alternative matched".to_string(),
                found: String::new(),
                column: 0,
            },
            ParseError::Fail(message) => ParseError::ParseError {
                message,
                found: String::new(),
                column: 0,
            },
            ParseError::WithContext { message, inner } => ParseError::WithContext {
                message,
                inner: Box::new(inner.into_fatal()),
            },
            fatal => fatal,
        }
    }

    /// Innermost error beneath any context wrappers.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::WithContext { inner, .. } => inner.root_cause(),
            other => other,
        }
    }
}
