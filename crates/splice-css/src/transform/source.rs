//! A tokenizer bound to the file it reads, so every error names that file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use splice_common::targets;

use crate::error::TransformError;
use crate::tokenizer::{CSSTokenizer, LexError, Position, Token};

pub(crate) struct TokenSource {
    tokenizer: CSSTokenizer,
    path: PathBuf,
}

impl TokenSource {
    /// Read the whole file up front; tokenizing never touches the disk.
    pub(crate) fn open(path: &Path) -> Result<Self, TransformError> {
        let css = fs::read_to_string(path).map_err(|error| TransformError::io(path, error))?;
        trace!(target: targets::TOKENIZER, path = %path.display(), bytes = css.len(), "read stylesheet");
        Ok(Self::from_text(path, css))
    }

    pub(crate) fn from_text(path: &Path, css: impl Into<String>) -> Self {
        Self {
            tokenizer: CSSTokenizer::new(css),
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that relative `@require` paths resolve against.
    pub(crate) fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, TransformError> {
        self.tokenizer.next_token().map_err(|error| self.lex_error(error))
    }

    /// Next token that is not whitespace or a comment.
    pub(crate) fn next_significant(&mut self) -> Result<Token, TransformError> {
        self.tokenizer
            .next_significant()
            .map_err(|error| self.lex_error(error))
    }

    pub(crate) fn position(&self, token: &Token) -> Position {
        self.tokenizer.position_of(token.offset)
    }

    pub(crate) fn unexpected_eof(&self) -> TransformError {
        TransformError::UnexpectedEof {
            path: self.path.clone(),
        }
    }

    fn lex_error(&self, error: LexError) -> TransformError {
        TransformError::Lex {
            path: self.path.clone(),
            error,
        }
    }
}
