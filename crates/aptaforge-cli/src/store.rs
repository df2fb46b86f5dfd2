use crate::error::{CliError, Result};
use aptaforge::weights::{self, ScanReport, WeightFile, full_manifest};
use directories::ProjectDirs;
use futures_util::StreamExt;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub enum DownloadProgress {
    FileStarted {
        name: &'static str,
        total_bytes: Option<u64>,
    },
    Downloading {
        downloaded: u64,
    },
    FileFinished {
        name: &'static str,
    },
}

#[derive(Debug, Default)]
pub struct RepairSummary {
    pub fetched: Vec<&'static str>,
    pub already_intact: usize,
}

/// Local store of model checkpoint and parameter files.
///
/// Lives in the OS data directory by default; a `path.conf` file in the
/// config directory overrides the location.
#[derive(Debug)]
pub struct WeightStore {
    base_path: PathBuf,
}

impl WeightStore {
    pub fn new() -> Result<Self> {
        let path = Self::determine_store_path()?;
        debug!("WeightStore initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Audits the store against the full manifest.
    pub fn scan_all(&self) -> Result<ScanReport> {
        Ok(weights::scan(&self.base_path, full_manifest())?)
    }

    /// Deletes damaged files and fetches them again. With `force`, every
    /// manifest entry is refetched regardless of its state.
    pub async fn repair(
        &self,
        force: bool,
        mut progress_callback: impl FnMut(DownloadProgress),
    ) -> Result<RepairSummary> {
        fs::create_dir_all(&self.base_path)?;
        let report = self.scan_all()?;

        let targets: Vec<&'static WeightFile> = if force {
            full_manifest().collect()
        } else {
            report.needs_repair().map(|e| e.file).collect()
        };

        let mut summary = RepairSummary {
            fetched: Vec::new(),
            already_intact: if force { 0 } else { report.intact_count() },
        };

        if targets.is_empty() {
            info!("Weight store is complete, nothing to repair.");
            return Ok(summary);
        }

        let client = reqwest::Client::new();
        for file in targets {
            let target_path = self.base_path.join(file.name);
            if target_path.exists() {
                info!("Removing damaged or outdated file {:?}", &target_path);
                fs::remove_file(&target_path)?;
            }
            self.fetch(&client, file, &mut progress_callback).await?;
            summary.fetched.push(file.name);
        }

        Ok(summary)
    }

    async fn fetch(
        &self,
        client: &reqwest::Client,
        file: &'static WeightFile,
        progress_callback: &mut impl FnMut(DownloadProgress),
    ) -> Result<()> {
        info!("Fetching {} from {}", file.name, file.url);
        let response = client.get(file.url).send().await?.error_for_status()?;

        progress_callback(DownloadProgress::FileStarted {
            name: file.name,
            total_bytes: response.content_length(),
        });

        // Stream into a partial file; only a completed, size-checked
        // download is renamed into place.
        let partial_path = self.base_path.join(format!("{}.partial", file.name));
        let mut output = tokio::fs::File::create(&partial_path).await?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item?;
            output.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            progress_callback(DownloadProgress::Downloading { downloaded });
        }
        output.flush().await?;
        drop(output);

        if downloaded < file.min_bytes {
            fs::remove_file(&partial_path)?;
            return Err(CliError::Store(format!(
                "Downloaded '{}' is only {} bytes (expected at least {}); the source may be serving an error page.",
                file.name, downloaded, file.min_bytes
            )));
        }

        fs::rename(&partial_path, self.base_path.join(file.name))?;
        progress_callback(DownloadProgress::FileFinished { name: file.name });
        Ok(())
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Store(format!(
                "Custom weight-store path must be absolute: {}",
                path.display()
            )));
        }
        let config_path = Self::path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, path.display().to_string()).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_store_path() -> Result<PathBuf> {
        match Self::path_config_file() {
            Ok(config_path) if config_path.exists() => {
                let custom_path = fs::read_to_string(&config_path)?.trim().to_string();
                if custom_path.is_empty() {
                    warn!("Custom path config file is empty, falling back to default path.");
                    Self::default_store_path()
                } else {
                    Ok(PathBuf::from(custom_path))
                }
            }
            _ => Self::default_store_path(),
        }
    }

    fn path_config_file() -> Result<PathBuf> {
        ProjectDirs::from("dev", "aptaforge", "aptaforge")
            .map(|dirs| dirs.config_dir().join("path.conf"))
            .ok_or_else(|| {
                CliError::Store("Could not determine config directory path.".to_string())
            })
    }

    fn default_store_path() -> Result<PathBuf> {
        ProjectDirs::from("dev", "aptaforge", "aptaforge")
            .map(|dirs| dirs.data_dir().join("weights"))
            .ok_or_else(|| {
                CliError::Store("Could not determine default weight-store path.".to_string())
            })
    }
}
