//! Lexical errors.

use core::fmt;

use thiserror::Error;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in chars, starting at 1.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What went wrong while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A `/*` with no closing `*/`.
    #[error("unterminated comment")]
    UnterminatedComment,
    /// A string with no closing quote before end of input.
    #[error("unterminated string")]
    UnterminatedString,
    /// An unescaped newline inside a string
    /// ([§ 4.3.5](https://www.w3.org/TR/css-syntax-3/#consume-string-token) `<bad-string-token>`).
    #[error("newline in string")]
    NewlineInString,
}

/// A lexical error with the position of the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{position}: {kind}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Where the offending token starts.
    pub position: Position,
}
