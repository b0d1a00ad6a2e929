//! Firestocks Clock Infrastructure
//!
//! - `SystemClock`: wall-clock time, used by real sync passes
//! - `FixedClock`: frozen time that only moves when told to, used in tests

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use firestocks_ports::Clock;
