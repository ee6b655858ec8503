//! The `@require` / `@extend` transformer.
//!
//! A transform streams one stylesheet through the tokenizer and re-emits it
//! almost verbatim:
//!
//! - `@require "other.css";` transforms `other.css` (relative to the current
//!   file) with output suppressed, harvesting its rules into the *required*
//!   store. Requires nest; all of them feed the same store.
//! - `@extend .x;` looks `.x` up in the required store and injects its
//!   declarations after a `/* @extend .x */` marker.
//!
//! Everything else passes through byte-for-byte.
//!
//! ```no_run
//! let mut out = Vec::new();
//! let transformed = splice_css::transform_file("styles/main.css", &mut out)?;
//! assert!(transformed.required.contains(".button"));
//! # Ok::<(), splice_css::TransformError>(())
//! ```

/// Selector key normalization shared by rule capture and `@extend`.
pub mod selector;
/// The selector-to-declarations store.
pub mod store;

mod session;
mod sink;
mod source;
mod transformer;

use std::io::Write;
use std::path::Path;

use strum_macros::EnumString;

use crate::error::TransformError;
use crate::tokenizer::{Token, TokenKind};
use session::Session;
use sink::Sink;
use source::TokenSource;

pub use selector::SelectorKey;
pub use store::RuleStore;

/// The at-keywords the transformer interprets. Every other at-rule passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Directive {
    /// `@require "path.css";` harvests rules from another file.
    Require,
    /// `@extend .selector;` injects previously harvested declarations.
    Extend,
}

impl Directive {
    /// The directive an at-keyword token spells, if any.
    ///
    /// Matches the source text exactly, so escaped spellings such as
    /// `@\72 equire` and other casings are ordinary at-rules.
    #[must_use]
    pub fn from_token(token: &Token) -> Option<Self> {
        if !matches!(token.kind, TokenKind::AtKeyword(_)) {
            return None;
        }
        token.literal.strip_prefix('@')?.parse().ok()
    }
}

/// The rule stores collected by one top-level transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformed {
    /// Rules declared in the root stylesheet itself.
    pub local: RuleStore,
    /// Rules harvested from every transitively required stylesheet.
    pub required: RuleStore,
}

/// Transform the stylesheet at `path`, writing the result to `out`.
///
/// # Errors
///
/// Fails on the first I/O, lexical, or structural error anywhere in the
/// `@require` tree. Output written before the error is not rolled back.
pub fn transform_file(
    path: impl AsRef<Path>,
    out: &mut dyn Write,
) -> Result<Transformed, TransformError> {
    let source = TokenSource::open(path.as_ref())?;
    transform_source(source, out)
}

/// Transform an in-memory stylesheet, writing the result to `out`.
///
/// `name` labels errors and anchors relative `@require` paths; it does not
/// have to exist on disk.
///
/// # Errors
///
/// Same as [`transform_file`].
pub fn transform_str(
    name: impl AsRef<Path>,
    css: &str,
    out: &mut dyn Write,
) -> Result<Transformed, TransformError> {
    let source = TokenSource::from_text(name.as_ref(), css);
    transform_source(source, out)
}

/// Run the suppressed-output transform on `path` and return what it harvests:
/// its own rules plus those of everything it requires.
///
/// # Errors
///
/// Same as [`transform_file`], plus [`TransformError::CyclicRequire`] if
/// `path` ends up requiring itself.
pub fn harvest_file(path: impl AsRef<Path>) -> Result<RuleStore, TransformError> {
    let mut session = Session::new();
    session.require(path.as_ref())?;
    Ok(session.into_required())
}

fn transform_source(
    source: TokenSource,
    out: &mut dyn Write,
) -> Result<Transformed, TransformError> {
    let mut session = Session::new();
    session.run_root(source, &mut Sink::new(out))?;
    Ok(session.into_transformed())
}
