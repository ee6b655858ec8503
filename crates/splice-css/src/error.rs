//! Errors that abort a transform.
//!
//! Every variant is fatal. The one recoverable problem, an `@extend` whose
//! target was never required, is reported inline in the output instead.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::tokenizer::{LexError, Position};

/// A fatal transform failure. Bytes already written to the output stay written.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Opening or reading a stylesheet failed, either the root file or a required one.
    #[error("{}: {error}", .path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        error: io::Error,
    },

    /// The tokenizer rejected the input.
    #[error("{}:{error}", .path.display())]
    Lex {
        /// The file being tokenized.
        path: PathBuf,
        /// The lexical error with its position.
        error: LexError,
    },

    /// Input ended inside a block, a rule, or a directive.
    #[error("{}: unexpected end of input", .path.display())]
    UnexpectedEof {
        /// The file that ended early.
        path: PathBuf,
    },

    /// A `}` appeared with no open block.
    #[error("{}:{position}: unmatched `}}`", .path.display())]
    UnmatchedBrace {
        /// The file containing the brace.
        path: PathBuf,
        /// Where the brace is.
        position: Position,
    },

    /// `@require` was followed by something other than quoted paths.
    #[error("{}:{position}: expected a quoted path after @require, found `{found}`", .path.display())]
    InvalidRequire {
        /// The file containing the directive.
        path: PathBuf,
        /// Where the offending token is.
        position: Position,
        /// The offending token's source text.
        found: String,
    },

    /// A file requires itself, directly or through other files.
    #[error("cyclic @require: {}", display_chain(.chain))]
    CyclicRequire {
        /// The require chain, starting and ending with the same file.
        chain: Vec<PathBuf>,
    },

    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Write(io::Error),
}

impl TransformError {
    pub(crate) fn io(path: &Path, error: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            error,
        }
    }
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
