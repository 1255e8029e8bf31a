//! Injectable sink for pointer errors.
//!
//! Pointer operations return `Result` and never log on their own. Callers that
//! prefer "value or nothing" pass a [`Reporter`] to [`ReportExt::reported`].

use std::cell::RefCell;

use crate::error::PointerError;

/// Receives errors that a caller chose not to handle itself.
pub trait Reporter {
    fn report(&self, error: &PointerError);
}

impl<F> Reporter for F
where
    F: Fn(&PointerError),
{
    fn report(&self, error: &PointerError) {
        self(error)
    }
}

/// Forwards every error to `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, error: &PointerError) {
        tracing::warn!(target: "schema_kit::pointer", kind = error.kind(), "{}", error);
    }
}

/// Buffers errors for later inspection.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: RefCell<Vec<PointerError>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors reported so far.
    pub fn errors(&self) -> Vec<PointerError> {
        self.errors.borrow().clone()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<PointerError> {
        self.errors.take()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, error: &PointerError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

/// Report-and-discard for pointer results.
pub trait ReportExt<T> {
    /// `Some(value)` on success; otherwise hand the error to `reporter` and
    /// return `None`.
    fn reported(self, reporter: &dyn Reporter) -> Option<T>;
}

impl<T> ReportExt<T> for Result<T, PointerError> {
    fn reported(self, reporter: &dyn Reporter) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                reporter.report(&error);
                None
            }
        }
    }
}
