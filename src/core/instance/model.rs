use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported mod loaders — strongly typed, no magic strings.
///
/// `Modpack` marks instances created from a pack archive whose loader could
/// not be narrowed down to Fabric or Forge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoaderKind {
    Vanilla,
    Fabric,
    Forge,
    Modpack,
}

impl std::fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderKind::Vanilla => write!(f, "Vanilla"),
            LoaderKind::Fabric => write!(f, "Fabric"),
            LoaderKind::Forge => write!(f, "Forge"),
            LoaderKind::Modpack => write!(f, "Modpack"),
        }
    }
}

/// Manifest persisted to disk as `instance.json` next to the instance's
/// `.minecraft` directory.
///
/// For instances created from a pack archive, `version` is the installed
/// toolchain version id (e.g. `fabric-loader-0.16.10-1.20.1`) rather than a
/// plain game version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub name: String,
    pub version: String,
    pub loader: LoaderKind,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl InstanceConfig {
    pub fn new(name: impl Into<String>, version: impl Into<String>, loader: LoaderKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            loader,
            created_at: Utc::now(),
        }
    }

    /// Record substituted when a manifest is missing or unreadable.
    pub fn fallback(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "Unknown".to_string(),
            loader: LoaderKind::Vanilla,
            created_at: Utc::now(),
        }
    }
}

/// Path helpers for one instance's directory subtree.
#[derive(Debug, Clone)]
pub struct InstancePaths {
    root: PathBuf,
}

impl InstancePaths {
    pub fn new(instances_dir: &Path, name: &str) -> Self {
        Self {
            root: instances_dir.join(name),
        }
    }

    /// `instances/<name>/`
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `instances/<name>/.minecraft/` — the runtime-managed game directory.
    pub fn minecraft_dir(&self) -> PathBuf {
        self.root.join(".minecraft")
    }

    /// `instances/<name>/.minecraft/mods/`
    pub fn mods_dir(&self) -> PathBuf {
        self.minecraft_dir().join("mods")
    }

    /// `instances/<name>/instance.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("instance.json")
    }
}
