/// One-way notification channel from long-running operations to whatever
/// renders them. Implementations must not block: installers call these
/// methods from the middle of download loops.
///
/// The three methods mirror the shape of the toolchain's progress reporting:
/// a status line, a current value, and the value's maximum.
pub trait ProgressSink: Send + Sync {
    fn set_status(&self, status: &str);
    fn set_progress(&self, value: u64);
    fn set_max(&self, max: u64);
}

/// Sink that discards everything, for callers without a UI.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_status(&self, _status: &str) {}
    fn set_progress(&self, _value: u64) {}
    fn set_max(&self, _max: u64) {}
}
