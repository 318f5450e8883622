use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

const APP_DIR_NAME: &str = "modhaven";
const NAME_CACHE_FILE: &str = "name_cache.json";
const SETTINGS_FILE: &str = "settings.json";

/// Filesystem layout shared by every component: the instances root, the
/// staging area for modpack downloads, and the two process-wide files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
    instances_dir: PathBuf,
    temp_dir: PathBuf,
}

impl AppPaths {
    /// Build the layout under an explicit base directory, creating the
    /// directories eagerly so later operations can assume they exist.
    pub fn new(base_dir: PathBuf) -> LauncherResult<Self> {
        let canonical_base = canonical_or_create_dir(&base_dir)?;
        let instances_dir = canonical_or_create_dir(&canonical_base.join("instances"))?;
        let temp_dir = canonical_or_create_dir(&canonical_base.join("temp"))?;

        Ok(Self {
            base_dir: canonical_base,
            instances_dir,
            temp_dir,
        })
    }

    /// Default layout under the platform data directory.
    pub fn from_system() -> LauncherResult<Self> {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        Self::new(base)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn instances_dir(&self) -> &Path {
        &self.instances_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn name_cache_file(&self) -> PathBuf {
        self.base_dir.join(NAME_CACHE_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }
}

fn canonical_or_create_dir(path: &Path) -> LauncherResult<PathBuf> {
    std::fs::create_dir_all(path).map_err(|source| LauncherError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::canonicalize(path).map_err(|source| LauncherError::Io {
        path: path.to_path_buf(),
        source,
    })
}
