//! Operation boundary consumed by the presentation layer.
//!
//! Everything foreseeable is caught here and converted to an [`OpOutcome`]
//! or a safe default; no error unwinds past this module. Long-running
//! operations take a [`ProgressSink`] the UI implements.

use std::path::Path;

use serde::Serialize;
use tracing::error;

use crate::core::context::AppContext;
use crate::core::install::ProgressSink;
use crate::core::instance::{InstanceConfig, LoaderKind};
use crate::core::java;
use crate::core::launch;
use crate::core::mods::{self, ModEntry};
use crate::core::registry::{ProjectKind, ProjectVersion, SearchHit};
use crate::core::settings::Settings;

/// Result of a fallible user-facing operation.
#[derive(Debug, Clone, Serialize)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
}

impl OpOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Create an instance with a base game version and optional loader.
pub async fn create_instance(
    ctx: &AppContext,
    name: &str,
    version: &str,
    loader: LoaderKind,
    progress: &dyn ProgressSink,
) -> OpOutcome {
    if let Err(reason) = validate_instance_name(name) {
        return OpOutcome::failed(reason);
    }

    match ctx
        .orchestrator()
        .create_instance(name, version, loader, progress)
        .await
    {
        Ok(_) => OpOutcome::ok("Created"),
        Err(e) => {
            error!("Instance create failed: {}", e);
            OpOutcome::failed(e.to_string())
        }
    }
}

/// Create an instance from an explicitly chosen modpack version.
pub async fn install_modpack(
    ctx: &AppContext,
    name: &str,
    pack: &ProjectVersion,
    progress: &dyn ProgressSink,
) -> OpOutcome {
    if let Err(reason) = validate_instance_name(name) {
        return OpOutcome::failed(reason);
    }

    match ctx.orchestrator().install_modpack(name, pack, progress).await {
        Ok(_) => OpOutcome::ok(format!("Installed {}", name)),
        Err(e) => {
            error!("Modpack install failed: {}", e);
            OpOutcome::failed(e.to_string())
        }
    }
}

pub async fn delete_instance(ctx: &AppContext, name: &str) -> bool {
    ctx.store.delete(name).await
}

pub async fn list_instances(ctx: &AppContext) -> Vec<String> {
    ctx.store.list().await
}

pub async fn instance_config(ctx: &AppContext, name: &str) -> InstanceConfig {
    ctx.store.read_config(name).await
}

/// Launch an instance and wait for the game to exit.
pub async fn launch_instance(ctx: &AppContext, name: &str, username: &str) -> OpOutcome {
    let settings = ctx.settings();

    match launch::launch_instance(&ctx.store, ctx.toolchain.as_ref(), &settings, name, username)
        .await
    {
        Ok(status) => OpOutcome::ok(format!("Exited with {}", status)),
        Err(e) => {
            error!("Launch failed: {}", e);
            OpOutcome::failed(e.to_string())
        }
    }
}

pub async fn list_mods(ctx: &AppContext, instance: &str) -> Vec<ModEntry> {
    mods::list_mods(&ctx.store, ctx.name_cache.clone(), instance).await
}

pub async fn toggle_mod(path: &Path) -> bool {
    mods::toggle_mod(path).await
}

pub async fn delete_mod(path: &Path) -> bool {
    mods::delete_mod(path).await
}

/// Install the latest compatible registry file into an instance.
pub async fn install_mod(
    ctx: &AppContext,
    project_id: &str,
    instance: &str,
    progress: &dyn ProgressSink,
) -> OpOutcome {
    match mods::install_mod(
        &ctx.store,
        &ctx.registry,
        &ctx.downloader,
        project_id,
        instance,
        progress,
    )
    .await
    {
        Ok(filename) => OpOutcome::ok(format!("Installed {}", filename)),
        Err(e) => OpOutcome::failed(e.to_string()),
    }
}

/// Search the registry; failures surface as empty results, never errors.
pub async fn search_projects(
    ctx: &AppContext,
    query: &str,
    kind: ProjectKind,
    game_version: Option<&str>,
    loader: Option<&LoaderKind>,
) -> Vec<SearchHit> {
    ctx.registry.search(query, kind, game_version, loader).await
}

/// Published versions of a pack, for the version-picker dialog.
pub async fn pack_versions(ctx: &AppContext, project_id: &str) -> Vec<ProjectVersion> {
    ctx.registry.project_versions(project_id).await
}

pub fn get_settings(ctx: &AppContext) -> Settings {
    ctx.settings()
}

pub fn save_settings(ctx: &AppContext, settings: Settings) -> OpOutcome {
    match ctx.update_settings(settings) {
        Ok(()) => OpOutcome::ok("Saved"),
        Err(e) => OpOutcome::failed(e.to_string()),
    }
}

/// Java executables worth offering in the settings dialog, headed by the
/// `"Auto"` sentinel.
pub fn java_candidates() -> Vec<String> {
    java::discover_candidates()
}

/// Instance names become directory names; reject anything that would escape
/// the instances root.
fn validate_instance_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Instance name is empty".to_string());
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(format!("Instance name {:?} is not filesystem-safe", name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_names_must_be_filesystem_safe() {
        assert!(validate_instance_name("survival world").is_ok());
        assert!(validate_instance_name("").is_err());
        assert!(validate_instance_name("  ").is_err());
        assert!(validate_instance_name("../escape").is_err());
        assert!(validate_instance_name("a/b").is_err());
        assert!(validate_instance_name("a\\b").is_err());
    }
}
