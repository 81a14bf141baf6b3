//! Cancellation and deadlines for package loading.
//!
//! Resolution itself is not interruptible; the token is consulted at the
//! package-load boundary, before any uncached load touches the disk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::sources::LoadError;

/// A cancel flag plus an optional deadline.
///
/// Clones share the same flag, so a caller can keep one handle and cancel
/// a load running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A token that is never cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Cancellation {
            cancelled: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// A token that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Cancellation {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail if the token was cancelled or its deadline has passed.
    pub fn check(&self) -> Result<(), LoadError> {
        if self.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(LoadError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
