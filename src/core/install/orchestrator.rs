use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::progress::ProgressSink;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::instance::{InstanceConfig, InstanceStore, LoaderKind};
use crate::core::registry::ProjectVersion;
use crate::core::toolchain::{InstalledVersion, ToolchainInstaller};

/// Loader markers looked for in installed version ids after a modpack
/// install, in precedence order. The first installed entry containing any
/// marker supplies the launch version; the first marker matching within that
/// id supplies the loader kind. `forge` deliberately also captures
/// `neoforge` ids; `quilt` selects the version but keeps the generic kind.
const LOADER_ID_MARKERS: &[(&str, LoaderKind)] = &[
    ("fabric", LoaderKind::Fabric),
    ("forge", LoaderKind::Forge),
    ("quilt", LoaderKind::Modpack),
];

/// Drives multi-stage installs: base game plus loader, or a modpack bundle.
///
/// Each install is an all-or-nothing transaction at directory granularity:
/// any stage failure deletes the whole instance directory that was created
/// (best effort) and propagates the original error. Concurrent installs of
/// the same instance are not coordinated; the caller must prevent them.
pub struct InstallOrchestrator {
    store: Arc<InstanceStore>,
    toolchain: Arc<dyn ToolchainInstaller>,
    downloader: Arc<Downloader>,
    temp_dir: PathBuf,
}

impl InstallOrchestrator {
    pub fn new(
        store: Arc<InstanceStore>,
        toolchain: Arc<dyn ToolchainInstaller>,
        downloader: Arc<Downloader>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            toolchain,
            downloader,
            temp_dir,
        }
    }

    /// Create an instance with a specific game version and loader.
    ///
    /// Fails up front with `InstanceAlreadyExists` if the directory is taken;
    /// there is no merge or upgrade path. A missing Forge release for the
    /// requested game version is a hard failure, not a silent skip.
    pub async fn create_instance(
        &self,
        name: &str,
        version: &str,
        loader: LoaderKind,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<InstanceConfig> {
        if self.store.exists(name) {
            return Err(LauncherError::InstanceAlreadyExists(name.to_string()));
        }

        self.store.create_skeleton(name).await?;

        match self.run_create_stages(name, version, loader, progress).await {
            Ok(config) => {
                info!("Created instance '{}' ({} {})", name, config.loader, version);
                Ok(config)
            }
            Err(e) => {
                self.rollback_instance(name).await;
                Err(e)
            }
        }
    }

    async fn run_create_stages(
        &self,
        name: &str,
        version: &str,
        loader: LoaderKind,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<InstanceConfig> {
        let minecraft_dir = self.store.paths(name).minecraft_dir();

        progress.set_status(&format!("Installing Minecraft {}", version));
        self.toolchain
            .install_game(version, &minecraft_dir, progress)
            .await?;

        match &loader {
            LoaderKind::Vanilla => {}
            LoaderKind::Fabric => {
                progress.set_status("Installing Fabric");
                self.toolchain
                    .install_fabric(version, &minecraft_dir)
                    .await?;
            }
            LoaderKind::Forge => {
                progress.set_status(&format!("Resolving Forge for {}", version));
                let forge_version = self.toolchain.find_forge(version).await?.ok_or_else(|| {
                    LauncherError::LoaderUnavailable {
                        loader: "Forge".to_string(),
                        game_version: version.to_string(),
                    }
                })?;

                progress.set_status(&format!("Installing Forge {}", forge_version));
                self.toolchain
                    .install_forge(&forge_version, &minecraft_dir)
                    .await?;
            }
            LoaderKind::Modpack => {
                return Err(LauncherError::Other(
                    "Modpack instances are created from a pack archive".to_string(),
                ));
            }
        }

        let config = InstanceConfig::new(name, version, loader);
        self.store.save_config(&config).await?;
        Ok(config)
    }

    /// Create an instance from a chosen modpack version.
    ///
    /// The bundle is staged into the temp directory with byte-level progress,
    /// handed to the toolchain, and the resulting installed-version list is
    /// inspected to infer the launch version and loader kind. The staged
    /// bundle is removed on success but kept on failure for diagnostics.
    pub async fn install_modpack(
        &self,
        name: &str,
        pack: &ProjectVersion,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<InstanceConfig> {
        if self.store.exists(name) {
            return Err(LauncherError::InstanceAlreadyExists(name.to_string()));
        }

        let file = pack
            .files
            .first()
            .ok_or_else(|| LauncherError::Other("Pack version has no files".to_string()))?;

        let bundle_path = self
            .temp_dir
            .join(format!("{}_{}", Uuid::new_v4(), file.filename));

        progress.set_status(&format!("Downloading {}", file.filename));
        self.downloader
            .download_file(
                &file.url,
                &bundle_path,
                file.hashes.sha1.as_deref(),
                progress,
            )
            .await?;

        self.store.create_skeleton(name).await?;

        match self.run_pack_stages(name, &bundle_path, progress).await {
            Ok(config) => {
                let _ = tokio::fs::remove_file(&bundle_path).await;
                info!("Installed modpack '{}' as {}", name, config.version);
                Ok(config)
            }
            Err(e) => {
                // The staged bundle stays behind on purpose for diagnostics.
                self.rollback_instance(name).await;
                Err(e)
            }
        }
    }

    async fn run_pack_stages(
        &self,
        name: &str,
        bundle_path: &std::path::Path,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<InstanceConfig> {
        let minecraft_dir = self.store.paths(name).minecraft_dir();

        progress.set_status("Installing modpack files");
        self.toolchain
            .install_modpack(bundle_path, &minecraft_dir)
            .await?;

        let installed = self.toolchain.installed_versions(&minecraft_dir);
        let (version_id, loader) = infer_pack_install(&installed);

        let config = InstanceConfig::new(
            name,
            version_id.unwrap_or_else(|| "Unknown".to_string()),
            loader,
        );
        self.store.save_config(&config).await?;
        Ok(config)
    }

    async fn rollback_instance(&self, name: &str) {
        let root = self.store.paths(name).root().to_path_buf();
        if let Err(e) = tokio::fs::remove_dir_all(&root).await {
            warn!("Rollback could not remove {:?}: {}", root, e);
        }
    }
}

/// Inspect installed version ids after a pack install and infer what to
/// launch and which loader tag to record.
fn infer_pack_install(installed: &[InstalledVersion]) -> (Option<String>, LoaderKind) {
    for version in installed {
        let id = version.id.to_lowercase();
        for (marker, kind) in LOADER_ID_MARKERS {
            if id.contains(marker) {
                return (Some(version.id.clone()), kind.clone());
            }
        }
    }

    (
        installed.first().map(|version| version.id.clone()),
        LoaderKind::Modpack,
    )
}
