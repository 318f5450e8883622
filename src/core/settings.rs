use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{LauncherError, LauncherResult};

/// Sentinel for "let the selector pick a runtime".
pub const AUTO_JAVA: &str = "Auto";

const DEFAULT_MAX_RAM_GB: u32 = 4;

/// Process-wide configuration, persisted as `settings.json`.
///
/// Loads substitute the defaults on any read or parse failure; saves always
/// write the full record, there is no partial-update merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum game memory in gigabytes (`-Xmx`).
    pub max_ram: u32,
    /// Explicit Java executable path, or [`AUTO_JAVA`].
    pub java_path: String,
    /// Adds conservative G1 tuning flags to the launch command.
    pub low_end_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_ram: DEFAULT_MAX_RAM_GB,
            java_path: AUTO_JAVA.to_string(),
            low_end_mode: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Corrupt settings at {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    /// Persist the full record.
    pub fn save(&self, path: &Path) -> LauncherResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| LauncherError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamp `max_ram` to physical memory so a value carried over from
    /// another machine cannot produce an unlaunchable `-Xmx`.
    pub fn clamped_to_system(mut self) -> Self {
        self.max_ram = self.max_ram.clamp(1, physical_memory_gb());
        self
    }

    pub fn uses_auto_java(&self) -> bool {
        self.java_path == AUTO_JAVA
    }
}

fn physical_memory_gb() -> u32 {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    let gb = system.total_memory() / (1024 * 1024 * 1024);
    (gb as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(settings.max_ram, 4);
        assert_eq!(settings.java_path, AUTO_JAVA);
        assert!(!settings.low_end_mode);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.max_ram, 4);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            max_ram: 2,
            java_path: "/opt/jdk-17/bin/java".into(),
            low_end_mode: true,
        };
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.max_ram, 2);
        assert_eq!(loaded.java_path, "/opt/jdk-17/bin/java");
        assert!(loaded.low_end_mode);
        assert!(!loaded.uses_auto_java());
    }
}
