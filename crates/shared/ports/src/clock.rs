use firestocks_core::Timestamp;

/// Source of the pass date
///
/// Every full payload and every merge carries a `date` field rendered from
/// `now()` when the pass projects it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Shown in the startup log
    fn name(&self) -> &str {
        "Clock"
    }
}
