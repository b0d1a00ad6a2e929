//! Cooperative cancellation between store calls

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{Phase, SyncError, SyncResult};

/// Cancellation flag plus optional deadline
///
/// Checked before every chunk commit and before every delete of a purge.
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cancel once `timeout` has elapsed from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Request cancellation; seen by every clone
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fail with `Cancelled` for `phase` if cancellation was requested
    pub fn check(&self, phase: Phase) -> SyncResult<()> {
        if self.is_cancelled() {
            log::warn!("Stopping {} on cancellation request", phase);
            return Err(SyncError::Cancelled { phase });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_by_clones() {
        let cancel = Cancellation::new();
        let observer = cancel.clone();
        assert!(observer.check(Phase::Write).is_ok());

        cancel.cancel();
        assert!(matches!(
            observer.check(Phase::Write),
            Err(SyncError::Cancelled {
                phase: Phase::Write
            })
        ));
    }

    #[test]
    fn test_elapsed_deadline_cancels() {
        let cancel = Cancellation::new().with_deadline(Instant::now());
        assert!(cancel.is_cancelled());

        let cancel = Cancellation::new().with_timeout(Duration::from_secs(3600));
        assert!(!cancel.is_cancelled());
    }
}
