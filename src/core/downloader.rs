use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::install::progress::ProgressSink;

/// Streaming, SHA-1 validated HTTP downloader.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` to `dest`, reporting byte-level progress.
    ///
    /// Creates parent directories as needed. The hash is computed over the
    /// stream; on mismatch the partial file is removed and an error returned.
    /// The file handle is dropped before returning so the destination can be
    /// renamed or deleted immediately, which matters on Windows.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
        progress: &dyn ProgressSink,
    ) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(total) = response.content_length() {
            progress.set_max(total);
        }

        let mut hasher = Sha1::new();
        let mut downloaded = 0_u64;

        {
            let mut file =
                tokio::fs::File::create(dest)
                    .await
                    .map_err(|source| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source,
                    })?;

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                hasher.update(&chunk);
                file.write_all(&chunk)
                    .await
                    .map_err(|source| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source,
                    })?;

                downloaded = downloaded.saturating_add(chunk.len() as u64);
                progress.set_progress(downloaded);
            }

            file.flush().await.map_err(|source| LauncherError::Io {
                path: dest.to_path_buf(),
                source,
            })?;
        }

        if let Some(expected) = sha1_expected {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                let _ = tokio::fs::remove_file(dest).await;
                return Err(LauncherError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, downloaded);
        Ok(())
    }
}
