use std::sync::{Arc, Mutex};

use reqwest::Client;

use crate::core::downloader::Downloader;
use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;
use crate::core::install::InstallOrchestrator;
use crate::core::instance::InstanceStore;
use crate::core::mods::NameCache;
use crate::core::paths::AppPaths;
use crate::core::registry::ModrinthClient;
use crate::core::settings::Settings;
use crate::core::toolchain::ToolchainInstaller;

/// The one long-lived service object, constructed at startup and passed
/// explicitly to every operation. Holds what older designs kept in
/// module-level globals: paths, the HTTP client, the name cache and the
/// loaded settings.
pub struct AppContext {
    paths: AppPaths,
    pub http_client: Client,
    pub store: Arc<InstanceStore>,
    pub registry: ModrinthClient,
    pub downloader: Arc<Downloader>,
    pub toolchain: Arc<dyn ToolchainInstaller>,
    pub name_cache: Arc<Mutex<NameCache>>,
    settings: Mutex<Settings>,
}

impl AppContext {
    pub fn new(paths: AppPaths, toolchain: Arc<dyn ToolchainInstaller>) -> LauncherResult<Self> {
        let http_client = build_http_client()?;
        let store = Arc::new(InstanceStore::new(paths.instances_dir().to_path_buf()));
        let registry = ModrinthClient::new(http_client.clone());
        let downloader = Arc::new(Downloader::new(http_client.clone()));
        let name_cache = Arc::new(Mutex::new(NameCache::new(paths.name_cache_file())));
        let settings = Mutex::new(Settings::load(&paths.settings_file()));

        Ok(Self {
            paths,
            http_client,
            store,
            registry,
            downloader,
            toolchain,
            name_cache,
            settings,
        })
    }

    /// Context rooted in the platform data directory.
    pub fn from_system(toolchain: Arc<dyn ToolchainInstaller>) -> LauncherResult<Self> {
        Self::new(AppPaths::from_system()?, toolchain)
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn orchestrator(&self) -> InstallOrchestrator {
        InstallOrchestrator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.toolchain),
            Arc::clone(&self.downloader),
            self.paths.temp_dir().to_path_buf(),
        )
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.lock().expect("settings poisoned").clone()
    }

    /// Replace the settings in memory and persist the full record.
    pub fn update_settings(&self, new_settings: Settings) -> LauncherResult<()> {
        let new_settings = new_settings.clamped_to_system();
        new_settings.save(&self.paths.settings_file())?;
        *self.settings.lock().expect("settings poisoned") = new_settings;
        Ok(())
    }
}
