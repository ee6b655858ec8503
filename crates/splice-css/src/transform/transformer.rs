//! The recursive-descent transformer.
//!
//! Tokens are echoed to the sink as they are consumed, so the output is the
//! input with `@require` statements removed and `@extend` statements replaced
//! by the declarations they pull in. Rule bodies are mirrored into a
//! [`RuleStore`](super::RuleStore) as a side effect.
//!
//! The four procedures recurse into each other purely on brace structure:
//!
//! - [`Transformer::process_block`] handles the root stylesheet and every `{ ... }` body;
//! - [`Transformer::capture_rule`] handles a selector list with its body, or a declaration;
//! - [`Transformer::pass_directive`] handles any at-rule other than ours;
//! - [`Transformer::handle_require`] and [`Transformer::handle_extend`] handle our two directives.

use std::mem;

use tracing::trace;

use splice_common::{targets, warning::warn_once};

use super::Directive;
use super::selector::SelectorKey;
use super::session::{Session, Target};
use super::sink::Sink;
use super::source::TokenSource;
use crate::error::TransformError;
use crate::tokenizer::{Token, TokenKind};

type Result<T> = std::result::Result<T, TransformError>;

pub(crate) struct Transformer<'s> {
    source: TokenSource,
    session: &'s mut Session,
    /// Store that captured rules go to.
    target: Target,
    /// Declarations of the innermost rule body being captured.
    props: Vec<String>,
}

impl<'s> Transformer<'s> {
    pub(crate) const fn new(source: TokenSource, session: &'s mut Session, target: Target) -> Self {
        Self {
            source,
            session,
            target,
            props: Vec::new(),
        }
    }

    /// Process the whole file as the root block.
    pub(crate) fn run(mut self, sink: &mut Sink<'_>) -> Result<()> {
        self.process_block(sink, true)
    }

    /// Consume a block until EOF (root) or its closing `}` (nested), which is echoed.
    fn process_block(&mut self, sink: &mut Sink<'_>, root: bool) -> Result<()> {
        // Last whitespace run seen in this block; used to indent injected declarations.
        let mut indent = String::new();

        loop {
            let token = self.source.next_token()?;

            match Directive::from_token(&token) {
                Some(Directive::Require) => {
                    self.handle_require()?;
                    continue;
                }
                Some(Directive::Extend) => {
                    self.handle_extend(&indent, sink)?;
                    continue;
                }
                None => {}
            }

            let closing = match token.kind {
                TokenKind::EOF if root => return Ok(()),
                TokenKind::EOF => return Err(self.source.unexpected_eof()),
                TokenKind::RightBrace => token,
                TokenKind::Whitespace => {
                    sink.write_str(&token.literal)?;
                    indent = token.literal;
                    continue;
                }
                _ if token.kind.is_trivia() => {
                    sink.write_str(&token.literal)?;
                    continue;
                }
                TokenKind::AtKeyword(_) => match self.pass_directive(token, sink)? {
                    Some(brace) => brace,
                    None => continue,
                },
                _ => match self.capture_rule(token, sink)? {
                    Some(brace) => brace,
                    None => continue,
                },
            };

            if root {
                return Err(TransformError::UnmatchedBrace {
                    path: self.source.path().to_path_buf(),
                    position: self.source.position(&closing),
                });
            }
            sink.write_str(&closing.literal)?;
            return Ok(());
        }
    }

    /// Capture a rule (`a, b { ... }`) or a declaration (`color: red;`),
    /// starting from its first token.
    ///
    /// Returns the `}` if the enclosing block closed before a `;` or `{`;
    /// the unterminated text is then kept as the body's last declaration.
    fn capture_rule(&mut self, first: Token, sink: &mut Sink<'_>) -> Result<Option<Token>> {
        let mut selectors = Vec::new();
        let mut key = SelectorKey::new();
        let mut text = String::new();
        let mut token = first;

        loop {
            match token.kind {
                TokenKind::EOF => return Err(self.source.unexpected_eof()),
                TokenKind::RightBrace => {
                    let declaration = text.trim_end();
                    if !declaration.is_empty() {
                        self.props.push(format!("{declaration};"));
                    }
                    return Ok(Some(token));
                }
                _ => {}
            }

            sink.write_str(&token.literal)?;

            match token.kind {
                TokenKind::Semicolon => {
                    text.push_str(&token.literal);
                    self.props.push(text);
                    return Ok(None);
                }
                TokenKind::LeftBrace => {
                    selectors.push(key.finish());
                    self.capture_body(selectors, sink)?;
                    return Ok(None);
                }
                TokenKind::Comma => {
                    text.push_str(&token.literal);
                    selectors.push(key.finish());
                }
                _ => {
                    text.push_str(&token.literal);
                    key.push(&token);
                }
            }

            token = self.source.next_token()?;
        }
    }

    /// Process a rule body and file its declarations under every selector.
    fn capture_body(&mut self, selectors: Vec<String>, sink: &mut Sink<'_>) -> Result<()> {
        let enclosing = mem::take(&mut self.props);
        let result = self.process_block(sink, false);
        let body = mem::replace(&mut self.props, enclosing);
        result?;

        let store = self.session.store_mut(self.target);
        for selector in selectors {
            trace!(target: targets::CAPTURE, %selector, declarations = body.len(), "captured rule");
            store.append(selector, body.iter().cloned());
        }
        Ok(())
    }

    /// Echo an at-rule we don't interpret, recursing into its block if it has one.
    ///
    /// Rules nested inside (e.g. under `@media`) are captured like top-level ones.
    fn pass_directive(&mut self, first: Token, sink: &mut Sink<'_>) -> Result<Option<Token>> {
        let mut token = first;

        loop {
            match token.kind {
                TokenKind::EOF => return Err(self.source.unexpected_eof()),
                TokenKind::RightBrace => return Ok(Some(token)),
                _ => {}
            }

            sink.write_str(&token.literal)?;

            match token.kind {
                TokenKind::Semicolon => return Ok(None),
                TokenKind::LeftBrace => {
                    self.process_block(sink, false)?;
                    return Ok(None);
                }
                _ => {}
            }

            token = self.source.next_token()?;
        }
    }

    /// `@require "a.css" "b.css";`
    ///
    /// Each path is relative to the directory of the file being processed.
    /// Produces no output.
    fn handle_require(&mut self) -> Result<()> {
        loop {
            let token = self.source.next_significant()?;
            match token.kind {
                TokenKind::Semicolon => return Ok(()),
                TokenKind::Comma => {}
                TokenKind::String => {
                    let path = self.source.dir().join(unquote(&token.literal));
                    self.session.require(&path)?;
                }
                TokenKind::EOF => return Err(self.source.unexpected_eof()),
                _ => {
                    return Err(TransformError::InvalidRequire {
                        path: self.source.path().to_path_buf(),
                        position: self.source.position(&token),
                        found: token.literal,
                    });
                }
            }
        }
    }

    /// `@extend .a, .b;`
    ///
    /// Injects the required declarations of each selector, in the order listed,
    /// behind a marker comment. Unknown selectors get a `NOT FOUND` marker and
    /// processing continues. A no-op while output is suppressed.
    fn handle_extend(&mut self, indent: &str, sink: &mut Sink<'_>) -> Result<()> {
        let mut selectors = Vec::new();
        let mut key = SelectorKey::new();

        loop {
            let token = self.source.next_token()?;
            match token.kind {
                TokenKind::Semicolon => break,
                TokenKind::Comma => selectors.push(key.finish()),
                TokenKind::EOF => return Err(self.source.unexpected_eof()),
                _ => key.push(&token),
            }
        }
        if !key.is_empty() {
            selectors.push(key.finish());
        }

        if sink.is_suppressed() {
            return Ok(());
        }

        let numbered = selectors.len() > 1;
        for (i, selector) in selectors.iter().enumerate() {
            if i != 0 {
                sink.write_str(indent)?;
            }
            let index = if numbered {
                format!("[{i}]")
            } else {
                String::new()
            };

            if let Some(declarations) = self.session.required().get(selector) {
                trace!(target: targets::EXTEND, %selector, declarations = declarations.len(), "extending");
                writeln!(sink, "/* @extend{index} {selector} */")?;
                for declaration in declarations {
                    write!(sink, "{indent}  {declaration}")?;
                }
                sink.write_str("\n")?;
            } else {
                writeln!(sink, "/* NOT FOUND @extend{index} {selector} */")?;
                warn_once(
                    "extend",
                    &format!(
                        "{}: no required rule for `{selector}`",
                        self.source.path().display()
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Strip exactly one quote from each end of a string literal. Escapes are left alone.
fn unquote(literal: &str) -> &str {
    let mut chars = literal.chars();
    let _ = chars.next();
    let _ = chars.next_back();
    chars.as_str()
}
