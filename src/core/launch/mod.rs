pub mod resolver;

pub use resolver::resolve_version_id;

use std::process::ExitStatus;

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::InstanceStore;
use crate::core::java;
use crate::core::settings::Settings;
use crate::core::toolchain::{LaunchOptions, ToolchainInstaller};

/// G1 tuning applied when low-resource mode is on. Fixed set; users who need
/// finer control should edit their toolchain profile instead.
const LOW_END_JVM_FLAGS: &[&str] = &[
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
];

/// Launch an instance and wait for the game to exit.
///
/// Resolves the installed version to run, assembles JVM memory flags from
/// settings and an offline identity, asks the toolchain for the argv, spawns
/// with the game directory as cwd, and blocks (off the async executor) until
/// the process ends. Callers report "idle" to any status collaborator only
/// after this returns.
pub async fn launch_instance(
    store: &InstanceStore,
    toolchain: &dyn ToolchainInstaller,
    settings: &Settings,
    name: &str,
    username: &str,
) -> LauncherResult<ExitStatus> {
    if !store.exists(name) {
        return Err(LauncherError::InstanceNotFound(name.to_string()));
    }

    let config = store.read_config(name).await;
    let minecraft_dir = store.paths(name).minecraft_dir();

    let installed = toolchain.installed_versions(&minecraft_dir);
    let version_id = resolve_version_id(&config, &installed).ok_or_else(|| {
        LauncherError::Other(format!("Instance {} has no installed versions", name))
    })?;

    let username = if username.trim().is_empty() {
        "Player"
    } else {
        username
    };

    let mut options = LaunchOptions::offline(username);
    options.jvm_args = jvm_args(settings);
    options.java_executable = java::select_java(&config.version, &settings.java_path);

    let argv = toolchain.game_command(&version_id, &minecraft_dir, &options)?;
    let program = argv
        .first()
        .ok_or_else(|| LauncherError::Other("Toolchain produced an empty command".to_string()))?;

    info!(
        "Launching {} as {} ({}, {}G)",
        name, username, version_id, settings.max_ram
    );
    debug!("Command: {:?}", argv);

    let mut command = std::process::Command::new(program);
    command.args(&argv[1..]).current_dir(&minecraft_dir);

    let mut child = command
        .spawn()
        .map_err(|e| LauncherError::Other(format!("Failed to spawn game process: {}", e)))?;

    // Waiting on a child is blocking; keep it off the async executor.
    let status = tokio::task::spawn_blocking(move || child.wait())
        .await
        .map_err(|e| LauncherError::Other(format!("Join error: {}", e)))?
        .map_err(|e| LauncherError::Other(format!("Wait failed: {}", e)))?;

    info!("Instance {} exited with {}", name, status);
    Ok(status)
}

/// Memory flags from settings, plus GC tuning in low-resource mode.
fn jvm_args(settings: &Settings) -> Vec<String> {
    let mut args = vec![format!("-Xmx{}G", settings.max_ram), "-Xms512M".to_string()];
    if settings.low_end_mode {
        args.extend(LOW_END_JVM_FLAGS.iter().map(|flag| flag.to_string()));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::AUTO_JAVA;

    #[test]
    fn jvm_args_carry_memory_flags() {
        let settings = Settings {
            max_ram: 8,
            java_path: AUTO_JAVA.to_string(),
            low_end_mode: false,
        };
        assert_eq!(jvm_args(&settings), vec!["-Xmx8G", "-Xms512M"]);
    }

    #[test]
    fn low_end_mode_appends_gc_tuning() {
        let settings = Settings {
            max_ram: 2,
            java_path: AUTO_JAVA.to_string(),
            low_end_mode: true,
        };

        let args = jvm_args(&settings);
        assert_eq!(args[0], "-Xmx2G");
        assert!(args.contains(&"-XX:+UseG1GC".to_string()));
        assert!(args.contains(&"-XX:MaxGCPauseMillis=50".to_string()));
    }
}
