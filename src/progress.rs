//! Advisory progress reporting with cooperative cancellation.
//!
//! Long operations report between coarse phases only. A callback returning
//! `false` cancels the operation at the next phase boundary; nothing is left
//! half-applied because every phase either completes or has not started.
//!
//! ```
//! use meshtree::progress::{Progress, ProgressCallback};
//!
//! let callback: ProgressCallback = Box::new(|p: &Progress| {
//!     println!("{}% {}", p.percent(), p.message);
//!     true
//! });
//! assert!(callback(&Progress::new(1, 4, "components")));
//! ```

use crate::error::{OperationError, Result};

/// Progress information passed to callbacks.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Phases completed so far.
    pub current: u64,
    /// Total number of phases.
    pub total: u64,
    /// The phase that just finished.
    pub message: String,
}

impl Progress {
    /// Create a new progress report.
    pub fn new(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }

    /// Get progress as a percentage (0 to 100).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }
}

/// Callback function for progress reporting.
///
/// Returns `true` to continue, `false` to request cancellation.
pub type ProgressCallback = Box<dyn Fn(&Progress) -> bool + Send + Sync>;

/// Reports a finished phase, turning a cancellation request into an error.
pub(crate) fn report(
    callback: Option<&ProgressCallback>,
    current: u64,
    total: u64,
    phase: &'static str,
) -> Result<()> {
    let Some(cb) = callback else {
        return Ok(());
    };
    if cb(&Progress::new(current, total, phase)) {
        Ok(())
    } else {
        Err(OperationError::Cancelled { phase }.into())
    }
}
