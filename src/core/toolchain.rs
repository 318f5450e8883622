use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::LauncherResult;
use crate::core::install::progress::ProgressSink;

/// One game/loader version present in a `.minecraft` directory, as reported
/// by the toolchain. Ids embed loader markers (`fabric-loader-…-1.20.1`);
/// this core never fabricates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledVersion {
    pub id: String,
    pub release_time: Option<String>,
}

/// Inputs for building a game command line.
///
/// The account is a fixed offline identity; authentication is out of scope.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub username: String,
    pub uuid: String,
    pub token: String,
    pub jvm_args: Vec<String>,
    /// Explicit Java executable; `None` lets the toolchain use its default.
    pub java_executable: Option<String>,
}

impl LaunchOptions {
    pub fn offline(username: &str) -> Self {
        Self {
            username: username.to_string(),
            uuid: "00000000-0000-0000-0000-000000000000".to_string(),
            token: "0".to_string(),
            jvm_args: Vec::new(),
            java_executable: None,
        }
    }
}

/// External collaborator that knows how to unpack game, loader and modpack
/// distributions into a `.minecraft` directory and how to assemble a launch
/// command line for an installed version.
///
/// The orchestrator owns sequencing, rollback and manifest writes; this trait
/// owns the mechanics of each individual stage.
#[async_trait]
pub trait ToolchainInstaller: Send + Sync {
    /// Install the base game. Long-running; stage and byte progress are
    /// reported through `progress`.
    async fn install_game(
        &self,
        version: &str,
        minecraft_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<()>;

    async fn install_fabric(&self, game_version: &str, minecraft_dir: &Path)
        -> LauncherResult<()>;

    /// Latest Forge build for a game version, `None` when Forge does not
    /// support it.
    async fn find_forge(&self, game_version: &str) -> LauncherResult<Option<String>>;

    async fn install_forge(&self, forge_version: &str, minecraft_dir: &Path)
        -> LauncherResult<()>;

    /// Extract a downloaded modpack bundle into the game directory.
    async fn install_modpack(&self, bundle: &Path, minecraft_dir: &Path) -> LauncherResult<()>;

    /// Versions currently installed under `minecraft_dir`, in filesystem
    /// listing order.
    fn installed_versions(&self, minecraft_dir: &Path) -> Vec<InstalledVersion>;

    /// Assemble the argv for launching `version_id` out of `minecraft_dir`.
    fn game_command(
        &self,
        version_id: &str,
        minecraft_dir: &Path,
        options: &LaunchOptions,
    ) -> LauncherResult<Vec<String>>;
}
