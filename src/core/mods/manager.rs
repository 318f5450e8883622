use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};

use super::name_cache::NameCache;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::install::progress::ProgressSink;
use crate::core::instance::{InstanceStore, LoaderKind};
use crate::core::registry::ModrinthClient;

/// Marker appended to a mod filename to park it without deleting it.
/// `foo.jar` is active, `foo.jar.disabled` is inactive — the filename IS the
/// persistence mechanism for the flag.
pub const DISABLED_SUFFIX: &str = ".disabled";

const ACTIVE_EXTENSION: &str = ".jar";

/// One mod file inside an instance's mods directory.
#[derive(Debug, Clone, Serialize)]
pub struct ModEntry {
    pub display_name: String,
    pub filename: String,
    pub path: PathBuf,
    pub enabled: bool,
}

/// Decode the on-disk state carried by a filename. `None` means the file is
/// not a mod at all and should be ignored.
pub fn decode_mod_state(filename: &str) -> Option<bool> {
    if filename.ends_with(ACTIVE_EXTENSION) {
        Some(true)
    } else if filename
        .strip_suffix(DISABLED_SUFFIX)
        .is_some_and(|stem| stem.ends_with(ACTIVE_EXTENSION))
    {
        Some(false)
    } else {
        None
    }
}

/// Encode the opposite state into a filename: append the marker to disable,
/// strip it to enable. Inverse of itself, so two toggles restore the
/// original name exactly.
pub fn toggled_filename(filename: &str) -> String {
    match filename.strip_suffix(DISABLED_SUFFIX) {
        Some(stem) => stem.to_string(),
        None => format!("{}{}", filename, DISABLED_SUFFIX),
    }
}

/// List an instance's mods, sorted case-insensitively by display name.
///
/// Display names come from the shared [`NameCache`]; the cache file is
/// written at most once per pass, and only when a lookup missed. Jar reads
/// are blocking, so the naming pass runs off the async executor.
pub async fn list_mods(
    store: &InstanceStore,
    cache: Arc<Mutex<NameCache>>,
    instance: &str,
) -> Vec<ModEntry> {
    let mods_dir = store.paths(instance).mods_dir();

    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(&mods_dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
            continue;
        };
        let Some(enabled) = decode_mod_state(&filename) else {
            continue;
        };
        files.push((path, filename, enabled));
    }

    let mut mods = tokio::task::spawn_blocking(move || {
        let mut cache = cache.lock().expect("name cache poisoned");
        let mods: Vec<ModEntry> = files
            .into_iter()
            .map(|(path, filename, enabled)| ModEntry {
                display_name: cache.display_name(&path),
                filename,
                path,
                enabled,
            })
            .collect();
        cache.save_if_dirty();
        mods
    })
    .await
    .unwrap_or_default();

    mods.sort_by_key(|entry| entry.display_name.to_lowercase());
    mods
}

/// Flip a mod between active and disabled by renaming it in place.
/// Fails soft: a rename error (file in use) leaves the file untouched.
pub async fn toggle_mod(path: &Path) -> bool {
    let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    let renamed = path.with_file_name(toggled_filename(filename));
    match tokio::fs::rename(path, &renamed).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to toggle {:?}: {}", path, e);
            false
        }
    }
}

/// Remove a mod file. Fails soft.
pub async fn delete_mod(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to delete {:?}: {}", path, e);
            false
        }
    }
}

/// Install the latest registry file compatible with an instance's loader and
/// game version. Returns the installed filename.
pub async fn install_mod(
    store: &InstanceStore,
    registry: &ModrinthClient,
    downloader: &Downloader,
    project_id: &str,
    instance: &str,
    progress: &dyn ProgressSink,
) -> LauncherResult<String> {
    let config = store.read_config(instance).await;
    let loader_filter = registry_loader_filter(&config.loader);

    let file = registry
        .latest_compatible_file(
            project_id,
            &[loader_filter.to_string()],
            Some(&[config.version.clone()]),
        )
        .await
        .ok_or_else(|| LauncherError::NoCompatibleFile(project_id.to_string()))?;

    progress.set_status(&format!("Downloading {}", file.filename));
    let dest = store.paths(instance).mods_dir().join(&file.filename);
    downloader
        .download_file(&file.url, &dest, file.hashes.sha1.as_deref(), progress)
        .await?;

    info!("Installed {} into {}", file.filename, instance);
    Ok(file.filename)
}

/// Registry loader string used when filtering compatible files. Vanilla
/// instances install Fabric-flavored files.
fn registry_loader_filter(loader: &LoaderKind) -> &'static str {
    match loader {
        LoaderKind::Vanilla | LoaderKind::Fabric => "fabric",
        LoaderKind::Forge => "forge",
        LoaderKind::Modpack => "modpack",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_recognizes_both_states() {
        assert_eq!(decode_mod_state("sodium.jar"), Some(true));
        assert_eq!(decode_mod_state("sodium.jar.disabled"), Some(false));
        assert_eq!(decode_mod_state("README.txt"), None);
        assert_eq!(decode_mod_state("archive.zip.disabled"), None);
    }

    #[test]
    fn toggled_filename_is_its_own_inverse() {
        let original = "iris-1.7.0+mc1.20.1.jar";
        let disabled = toggled_filename(original);
        assert_eq!(disabled, "iris-1.7.0+mc1.20.1.jar.disabled");
        assert_eq!(toggled_filename(&disabled), original);
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_filename() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("lithium.jar");
        std::fs::write(&jar, b"jar bytes").unwrap();

        assert!(toggle_mod(&jar).await);
        let disabled = temp.path().join("lithium.jar.disabled");
        assert!(disabled.exists());
        assert!(!jar.exists());

        assert!(toggle_mod(&disabled).await);
        assert!(jar.exists());
        assert!(!disabled.exists());
    }

    #[tokio::test]
    async fn toggle_missing_file_fails_soft() {
        assert!(!toggle_mod(Path::new("/nonexistent/mod.jar")).await);
    }

    #[tokio::test]
    async fn delete_is_boolean_not_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("gone.jar");
        std::fs::write(&jar, b"x").unwrap();

        assert!(delete_mod(&jar).await);
        assert!(!delete_mod(&jar).await);
    }

    #[tokio::test]
    async fn listing_skips_non_mod_files_and_sorts_by_display_name() {
        let temp = tempfile::tempdir().unwrap();
        let store = InstanceStore::new(temp.path().to_path_buf());
        let paths = store.create_skeleton("test").await.unwrap();
        let mods_dir = paths.mods_dir();
        std::fs::create_dir_all(&mods_dir).unwrap();

        // Plain files without embedded metadata: display name == filename.
        std::fs::write(mods_dir.join("Zeta.jar"), b"z").unwrap();
        std::fs::write(mods_dir.join("alpha.jar.disabled"), b"a").unwrap();
        std::fs::write(mods_dir.join("notes.txt"), b"n").unwrap();

        let cache = Arc::new(Mutex::new(NameCache::new(
            temp.path().join("name_cache.json"),
        )));
        let mods = list_mods(&store, cache, "test").await;

        let names: Vec<&str> = mods.iter().map(|m| m.filename.as_str()).collect();
        assert_eq!(names, vec!["alpha.jar.disabled", "Zeta.jar"]);
        assert!(!mods[0].enabled);
        assert!(mods[1].enabled);
    }

    #[tokio::test]
    async fn listing_twice_is_idempotent_and_writes_the_cache_once() {
        let temp = tempfile::tempdir().unwrap();
        let store = InstanceStore::new(temp.path().to_path_buf());
        let paths = store.create_skeleton("test").await.unwrap();
        std::fs::create_dir_all(paths.mods_dir()).unwrap();
        std::fs::write(paths.mods_dir().join("sodium.jar"), b"jar").unwrap();

        let cache_file = temp.path().join("name_cache.json");
        let cache = Arc::new(Mutex::new(NameCache::new(cache_file.clone())));

        let first = list_mods(&store, cache.clone(), "test").await;
        assert!(cache_file.exists(), "first pass writes the cache");

        // No filesystem change: the second pass is all cache hits and must
        // not write again.
        std::fs::remove_file(&cache_file).unwrap();
        let second = list_mods(&store, cache, "test").await;
        assert!(!cache_file.exists());

        let first_names: Vec<_> = first.iter().map(|m| m.display_name.clone()).collect();
        let second_names: Vec<_> = second.iter().map(|m| m.display_name.clone()).collect();
        assert_eq!(first_names, second_names);
    }

    #[tokio::test]
    async fn listing_missing_mods_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = InstanceStore::new(temp.path().to_path_buf());
        let cache = Arc::new(Mutex::new(NameCache::new(
            temp.path().join("name_cache.json"),
        )));
        assert!(list_mods(&store, cache, "ghost").await.is_empty());
    }
}
