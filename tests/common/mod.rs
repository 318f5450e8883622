#![allow(dead_code)]

use std::path::Path;

use async_trait::async_trait;

use modhaven::core::install::ProgressSink;
use modhaven::core::registry::{FileHashes, ModFile, ProjectVersion};
use modhaven::{InstalledVersion, LaunchOptions, LauncherError, LauncherResult, ToolchainInstaller};

/// Toolchain stand-in: each install stage materializes a directory under
/// `versions/`, so `installed_versions` reflects what "got installed".
#[derive(Default)]
pub struct StubToolchain {
    pub fail_game_install: bool,
    pub fail_pack_install: bool,
    pub forge_version: Option<String>,
    pub pack_ids: Vec<String>,
}

#[async_trait]
impl ToolchainInstaller for StubToolchain {
    async fn install_game(
        &self,
        version: &str,
        minecraft_dir: &Path,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<()> {
        if self.fail_game_install {
            return Err(LauncherError::Toolchain(
                "simulated download failure".to_string(),
            ));
        }
        progress.set_max(100);
        progress.set_progress(100);
        tokio::fs::create_dir_all(minecraft_dir.join("versions").join(version)).await?;
        Ok(())
    }

    async fn install_fabric(
        &self,
        game_version: &str,
        minecraft_dir: &Path,
    ) -> LauncherResult<()> {
        let id = format!("fabric-loader-0.16.10-{}", game_version);
        tokio::fs::create_dir_all(minecraft_dir.join("versions").join(id)).await?;
        Ok(())
    }

    async fn find_forge(&self, _game_version: &str) -> LauncherResult<Option<String>> {
        Ok(self.forge_version.clone())
    }

    async fn install_forge(
        &self,
        forge_version: &str,
        minecraft_dir: &Path,
    ) -> LauncherResult<()> {
        let id = format!("1.20.1-forge-{}", forge_version);
        tokio::fs::create_dir_all(minecraft_dir.join("versions").join(id)).await?;
        Ok(())
    }

    async fn install_modpack(&self, bundle: &Path, minecraft_dir: &Path) -> LauncherResult<()> {
        if self.fail_pack_install {
            return Err(LauncherError::Toolchain("corrupt bundle".to_string()));
        }
        if !bundle.exists() {
            return Err(LauncherError::Toolchain("bundle missing".to_string()));
        }
        for id in &self.pack_ids {
            tokio::fs::create_dir_all(minecraft_dir.join("versions").join(id)).await?;
        }
        Ok(())
    }

    fn installed_versions(&self, minecraft_dir: &Path) -> Vec<InstalledVersion> {
        let mut out = Vec::new();
        if let Ok(entries) = std::fs::read_dir(minecraft_dir.join("versions")) {
            for entry in entries.flatten() {
                if entry.path().is_dir() {
                    out.push(InstalledVersion {
                        id: entry.file_name().to_string_lossy().to_string(),
                        release_time: None,
                    });
                }
            }
        }
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    fn game_command(
        &self,
        _version_id: &str,
        _minecraft_dir: &Path,
        _options: &LaunchOptions,
    ) -> LauncherResult<Vec<String>> {
        Ok(vec!["true".to_string()])
    }
}

/// Minimal HTTP responder for download tests: serves `body` on every request.
pub async fn serve_bytes(body: &'static [u8]) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut request = [0_u8; 4096];
                let _ = socket.read(&mut request).await;
                let header = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/pack.mrpack", addr)
}

pub fn pack_version(url: String) -> ProjectVersion {
    ProjectVersion {
        name: "1.0.0".to_string(),
        game_versions: vec!["1.20.1".to_string()],
        files: vec![ModFile {
            filename: "pack.mrpack".to_string(),
            url,
            hashes: FileHashes::default(),
        }],
    }
}
