pub mod orchestrator;
pub mod progress;

pub use orchestrator::InstallOrchestrator;
pub use progress::{NoProgress, ProgressSink};
