use chrono::Utc;
use firestocks_core::Timestamp;
use firestocks_ports::Clock;

/// Wall-clock UTC, used by the `firestocks` binary
///
/// Date stamps follow the UTC day, so a pass started just after local
/// midnight may still stamp the previous date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "system (UTC)"
    }
}
