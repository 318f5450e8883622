use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::model::{InstanceConfig, InstancePaths};
use crate::core::error::{LauncherError, LauncherResult};

/// Manages the lifecycle of instance directories on disk.
///
/// The manifest is the source of truth for an instance's identity; a corrupt
/// or missing manifest degrades to [`InstanceConfig::fallback`] rather than
/// an error. Single-writer-per-instance is assumed throughout.
pub struct InstanceStore {
    /// Root directory where all instances live.
    instances_dir: PathBuf,
}

impl InstanceStore {
    pub fn new(instances_dir: PathBuf) -> Self {
        Self { instances_dir }
    }

    pub fn paths(&self, name: &str) -> InstancePaths {
        InstancePaths::new(&self.instances_dir, name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.paths(name).root().exists()
    }

    /// List instance names, sorted lexicographically.
    pub async fn list(&self) -> Vec<String> {
        let mut names = Vec::new();

        let mut entries = match tokio::fs::read_dir(&self.instances_dir).await {
            Ok(entries) => entries,
            Err(_) => return names,
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        names
    }

    /// Read an instance manifest; never errors.
    pub async fn read_config(&self, name: &str) -> InstanceConfig {
        let manifest_path = self.paths(name).manifest_path();

        let raw = match tokio::fs::read_to_string(&manifest_path).await {
            Ok(raw) => raw,
            Err(_) => return InstanceConfig::fallback(name),
        };

        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Corrupt manifest at {:?}: {}", manifest_path, e);
                InstanceConfig::fallback(name)
            }
        }
    }

    /// Persist an instance manifest as pretty JSON.
    pub async fn save_config(&self, config: &InstanceConfig) -> LauncherResult<()> {
        let manifest_path = self.paths(&config.name).manifest_path();
        let json = serde_json::to_string_pretty(config)?;

        tokio::fs::write(&manifest_path, json)
            .await
            .map_err(|source| LauncherError::Io {
                path: manifest_path,
                source,
            })
    }

    /// Delete an instance subtree. Partial failure (e.g. a locked file) is
    /// swallowed and reported as `false`.
    pub async fn delete(&self, name: &str) -> bool {
        let root = self.paths(name).root().to_path_buf();

        match tokio::fs::remove_dir_all(&root).await {
            Ok(()) => {
                info!("Deleted instance {}", name);
                true
            }
            Err(e) => {
                warn!("Failed to delete instance {}: {}", name, e);
                false
            }
        }
    }

    /// Create the directory skeleton for a new instance.
    pub async fn create_skeleton(&self, name: &str) -> LauncherResult<InstancePaths> {
        let paths = self.paths(name);
        let minecraft_dir = paths.minecraft_dir();

        tokio::fs::create_dir_all(&minecraft_dir)
            .await
            .map_err(|source| LauncherError::Io {
                path: minecraft_dir,
                source,
            })?;

        Ok(paths)
    }

    pub fn instances_dir(&self) -> &Path {
        &self.instances_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instance::model::LoaderKind;

    fn store_in(dir: &Path) -> InstanceStore {
        InstanceStore::new(dir.to_path_buf())
    }

    #[tokio::test]
    async fn list_is_sorted_and_skips_files() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_in(temp.path());

        std::fs::create_dir(temp.path().join("zeta")).unwrap();
        std::fs::create_dir(temp.path().join("alpha")).unwrap();
        std::fs::write(temp.path().join("stray.txt"), "x").unwrap();

        assert_eq!(store.list().await, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn list_of_missing_root_is_empty() {
        let store = store_in(Path::new("/nonexistent/instances"));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn read_config_falls_back_on_missing_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_in(temp.path());

        let config = store.read_config("ghost").await;
        assert_eq!(config.version, "Unknown");
        assert_eq!(config.loader, LoaderKind::Vanilla);
    }

    #[tokio::test]
    async fn read_config_falls_back_on_corrupt_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_in(temp.path());

        store.create_skeleton("broken").await.unwrap();
        std::fs::write(store.paths("broken").manifest_path(), "{oops").unwrap();

        let config = store.read_config("broken").await;
        assert_eq!(config.version, "Unknown");
    }

    #[tokio::test]
    async fn save_then_read_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_in(temp.path());

        store.create_skeleton("survival").await.unwrap();
        let config = InstanceConfig::new("survival", "1.20.1", LoaderKind::Fabric);
        store.save_config(&config).await.unwrap();

        let loaded = store.read_config("survival").await;
        assert_eq!(loaded.name, "survival");
        assert_eq!(loaded.version, "1.20.1");
        assert_eq!(loaded.loader, LoaderKind::Fabric);
    }

    #[tokio::test]
    async fn delete_removes_from_listing() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_in(temp.path());

        store.create_skeleton("doomed").await.unwrap();
        assert!(store.delete("doomed").await);
        assert!(!store.list().await.contains(&"doomed".to_string()));
        assert!(!store.delete("doomed").await);
    }
}
