//! CSS tokenizer and `@require` / `@extend` transformer for the splice preprocessor.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - Lossless: every token keeps its source text, comments included
//!   - Streaming, one token at a time, with line/column lexical errors
//!
//! - **Rule Store**
//!   - Append-only selector key to declarations mapping
//!   - One normalization for selector keys, shared by capture and lookup
//!
//! - **Transformer**
//!   - Verbatim passthrough of everything it does not interpret
//!   - `@require "file.css";` harvests rules from other files, transitively
//!   - `@extend .selector;` injects harvested declarations with a marker comment
//!   - Cyclic `@require` chains are reported as errors
//!
//! # Not Implemented
//!
//! - CSS validation or any semantics beyond braces, commas, and semicolons
//! - Selector specificity
//! - Minification

/// Errors that abort a transform.
pub mod error;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// The `@require` / `@extend` transformer and its rule stores.
pub mod transform;

// Re-exports for convenience
pub use error::TransformError;
pub use tokenizer::{CSSTokenizer, LexError, Token, TokenKind};
pub use transform::{
    Directive, RuleStore, SelectorKey, Transformed, harvest_file, transform_file, transform_str,
};
