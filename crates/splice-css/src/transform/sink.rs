//! Optional output sink.
//!
//! Required files are transformed with their output suppressed. Modelling
//! that as an absent writer turns every write site into a no-op.

use std::fmt;
use std::io::Write;

use crate::error::TransformError;

pub(crate) struct Sink<'w> {
    out: Option<&'w mut dyn Write>,
}

impl<'w> Sink<'w> {
    pub(crate) fn new(out: &'w mut dyn Write) -> Self {
        Self { out: Some(out) }
    }

    pub(crate) const fn suppressed() -> Self {
        Self { out: None }
    }

    pub(crate) const fn is_suppressed(&self) -> bool {
        self.out.is_none()
    }

    pub(crate) fn write_str(&mut self, text: &str) -> Result<(), TransformError> {
        if let Some(out) = self.out.as_mut() {
            out.write_all(text.as_bytes()).map_err(TransformError::Write)?;
        }
        Ok(())
    }

    /// Lets `write!` and `writeln!` target a sink directly.
    pub(crate) fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), TransformError> {
        if let Some(out) = self.out.as_mut() {
            out.write_fmt(args).map_err(TransformError::Write)?;
        }
        Ok(())
    }
}
