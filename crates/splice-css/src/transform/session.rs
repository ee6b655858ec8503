//! Per-invocation state shared by every transformer in one `@require` tree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use splice_common::targets;

use super::Transformed;
use super::sink::Sink;
use super::source::TokenSource;
use super::store::RuleStore;
use super::transformer::Transformer;
use crate::error::TransformError;

/// Which store captured rules are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// The root file's own rules.
    Local,
    /// Rules harvested from required files, at any depth.
    Required,
}

/// Created once per top-level transform and threaded by reference through
/// the whole recursion. There is exactly one writer at a time.
#[derive(Debug, Default)]
pub(crate) struct Session {
    local: RuleStore,
    required: RuleStore,
    /// Canonical paths of the files currently being processed, outermost first.
    stack: Vec<PathBuf>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn required(&self) -> &RuleStore {
        &self.required
    }

    pub(crate) fn store_mut(&mut self, target: Target) -> &mut RuleStore {
        match target {
            Target::Local => &mut self.local,
            Target::Required => &mut self.required,
        }
    }

    /// Transform the root stylesheet into `sink`, collecting its own rules locally.
    pub(crate) fn run_root(
        &mut self,
        source: TokenSource,
        sink: &mut Sink<'_>,
    ) -> Result<(), TransformError> {
        // An in-memory root may not exist on disk; it just can't be part of a cycle then.
        let canonical = fs::canonicalize(source.path()).ok();
        if let Some(path) = &canonical {
            self.stack.push(path.clone());
        }
        let result = Transformer::new(source, self, Target::Local).run(sink);
        if canonical.is_some() {
            let _ = self.stack.pop();
        }
        result
    }

    /// Harvest `path` into the required store with output suppressed.
    ///
    /// Nested `@require`s inside it land in the same store, so resolution is
    /// transitive. Fails fast on the first error anywhere in the chain.
    pub(crate) fn require(&mut self, path: &Path) -> Result<(), TransformError> {
        let canonical = fs::canonicalize(path).map_err(|error| TransformError::io(path, error))?;

        if let Some(start) = self.stack.iter().position(|open| *open == canonical) {
            let mut chain = self.stack[start..].to_vec();
            chain.push(canonical);
            return Err(TransformError::CyclicRequire { chain });
        }

        let source = TokenSource::open(path)?;
        debug!(target: targets::REQUIRE, path = %path.display(), depth = self.stack.len(), "harvesting required stylesheet");

        self.stack.push(canonical);
        let result = Transformer::new(source, self, Target::Required).run(&mut Sink::suppressed());
        let _ = self.stack.pop();
        result
    }

    pub(crate) fn into_transformed(self) -> Transformed {
        Transformed {
            local: self.local,
            required: self.required,
        }
    }

    pub(crate) fn into_required(self) -> RuleStore {
        self.required
    }
}
