use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Archive entry holding a mod's self-declared metadata.
const FABRIC_METADATA_ENTRY: &str = "fabric.mod.json";

/// Persistent map from `"<filename>_<sizeBytes>"` to a human-readable mod
/// name, backed by a single JSON file.
///
/// The filename+size key is a cheap content-identity proxy: a file replaced
/// by different content with the same name and size keeps its stale cached
/// name. Accepted tradeoff — the cache exists so a listing pass does not
/// re-open every jar, and entries are never invalidated automatically.
///
/// Loaded lazily once per process, written back in full only when a listing
/// pass added at least one entry.
pub struct NameCache {
    path: PathBuf,
    entries: Option<HashMap<String, String>>,
    dirty: bool,
}

impl NameCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: None,
            dirty: false,
        }
    }

    /// Display name for a mod file: cached, else read out of the jar, else
    /// the raw filename. Never errors.
    pub fn display_name(&mut self, path: &Path) -> String {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let key = format!("{}_{}", filename, size);

        if let Some(cached) = self.entries().get(&key) {
            return cached.clone();
        }

        let name = read_embedded_name(path).unwrap_or_else(|| filename.clone());
        self.entries().insert(key, name.clone());
        self.dirty = true;
        name
    }

    /// Write the cache back if any lookup missed since the last save.
    pub fn save_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }

        let Some(entries) = &self.entries else {
            return;
        };

        match serde_json::to_string_pretty(entries) {
            Ok(json) => match std::fs::write(&self.path, json) {
                Ok(()) => self.dirty = false,
                Err(e) => warn!("Failed to write name cache {:?}: {}", self.path, e),
            },
            Err(e) => warn!("Failed to serialize name cache: {}", e),
        }
    }

    fn entries(&mut self) -> &mut HashMap<String, String> {
        if self.entries.is_none() {
            let loaded = match std::fs::read(&self.path) {
                Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
                Err(_) => HashMap::new(),
            };
            self.entries = Some(loaded);
        }
        self.entries.as_mut().expect("entries loaded")
    }
}

/// Pull the `name` field out of the jar's embedded metadata document.
/// Any failure — not a zip, entry missing, field missing — is a `None`.
fn read_embedded_name(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    let mut archive = zip::ZipArchive::new(file).ok()?;
    let mut entry = archive.by_name(FABRIC_METADATA_ENTRY).ok()?;

    let mut raw = String::new();
    entry.read_to_string(&mut raw).ok()?;

    let metadata: serde_json::Value = serde_json::from_str(&raw).ok()?;
    let name = metadata.get("name")?.as_str()?.to_string();
    debug!("Resolved {:?} -> {}", path.file_name(), name);
    Some(name)
}
