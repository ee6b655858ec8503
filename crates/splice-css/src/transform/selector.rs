//! Selector key normalization.
//!
//! Rule capture and `@extend` resolution both turn a run of tokens into a
//! lookup key, and they must agree exactly. The rules:
//!
//! - comments are dropped;
//! - leading and trailing whitespace is dropped;
//! - an internal whitespace run becomes a single space, unless it touches a
//!   combinator (`>`, `+`, `~`), in which case it is dropped.
//!
//! So `.a .b` (descendant) and `.a.b` (compound) stay distinct, while
//! `ul>li` and `ul > li` produce the same key.

use std::mem;

use crate::tokenizer::{Token, TokenKind};

/// Incremental builder for one selector key.
#[derive(Debug, Default)]
pub struct SelectorKey {
    key: String,
    pending_space: bool,
}

impl SelectorKey {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            key: String::new(),
            pending_space: false,
        }
    }

    /// Feed the next token of the selector.
    pub fn push(&mut self, token: &Token) {
        match &token.kind {
            TokenKind::Whitespace => self.pending_space = !self.key.is_empty(),
            TokenKind::EOF => {}
            kind if kind.is_trivia() => {}
            kind => {
                if self.pending_space && !is_combinator(kind) && !self.ends_with_combinator() {
                    self.key.push(' ');
                }
                self.pending_space = false;
                self.key.push_str(&token.literal);
            }
        }
    }

    /// Returns true if no significant token has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Take the finished key and reset the builder for the next selector.
    pub fn finish(&mut self) -> String {
        self.pending_space = false;
        mem::take(&mut self.key)
    }

    fn ends_with_combinator(&self) -> bool {
        self.key.ends_with(['>', '+', '~'])
    }
}

const fn is_combinator(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Delim('>' | '+' | '~'))
}
