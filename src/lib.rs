pub mod commands;
pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::commands::OpOutcome;
pub use crate::core::context::AppContext;
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::install::{NoProgress, ProgressSink};
pub use crate::core::instance::{InstanceConfig, LoaderKind};
pub use crate::core::settings::Settings;
pub use crate::core::toolchain::{InstalledVersion, LaunchOptions, ToolchainInstaller};

/// Initialize structured logging for embedding applications.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,modhaven=debug")),
        )
        .init();
}
