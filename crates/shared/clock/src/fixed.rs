use std::sync::RwLock;

use chrono::Duration;
use firestocks_core::Timestamp;
use firestocks_ports::Clock;

/// Clock frozen at a given instant
///
/// Time only moves through `set` or `advance`, which makes the stamped pass
/// date deterministic.
pub struct FixedClock {
    current: RwLock<Timestamp>,
}

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        Self {
            current: RwLock::new(at),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, at: Timestamp) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = at;
    }

    /// Move forward (or backward, with a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
