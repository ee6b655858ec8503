//! CSS tokenizer module.

/// Lexical errors raised by the tokenizer.
pub mod error;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
pub mod tokenizer;

pub use error::{LexError, LexErrorKind, Position};
pub use token::{Token, TokenKind};
pub use tokenizer::{CSSTokenizer, tokenize};
