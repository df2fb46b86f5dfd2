use super::manifest::WeightFile;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("Failed to inspect '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Classification of one manifest entry against the weight store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightStatus {
    Ok,
    Missing,
    /// Zero-byte file, the typical residue of an interrupted download.
    Empty,
    Truncated {
        actual: u64,
        expected_min: u64,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FileAudit {
    pub file: &'static WeightFile,
    pub status: WeightStatus,
}

impl FileAudit {
    pub fn is_intact(&self) -> bool {
        self.status == WeightStatus::Ok
    }
}

#[derive(Debug)]
pub struct ScanReport {
    pub entries: Vec<FileAudit>,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(FileAudit::is_intact)
    }

    pub fn intact_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_intact()).count()
    }

    /// Entries that must be deleted and fetched again.
    pub fn needs_repair(&self) -> impl Iterator<Item = &FileAudit> {
        self.entries.iter().filter(|e| !e.is_intact())
    }
}

/// Audits `dir` against a manifest. Purely local: reads file metadata only,
/// never the network.
pub fn scan<I>(dir: &Path, manifest: I) -> Result<ScanReport, WeightsError>
where
    I: IntoIterator<Item = &'static WeightFile>,
{
    let mut entries = Vec::new();
    for file in manifest {
        let path = dir.join(file.name);
        let status = match fs::metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => WeightStatus::Missing,
            Err(e) => return Err(WeightsError::Io { path, source: e }),
            Ok(meta) if meta.len() == 0 => WeightStatus::Empty,
            Ok(meta) if meta.len() < file.min_bytes => WeightStatus::Truncated {
                actual: meta.len(),
                expected_min: file.min_bytes,
            },
            Ok(_) => WeightStatus::Ok,
        };
        debug!(name = file.name, ?status, "Audited weight file");
        entries.push(FileAudit { file, status });
    }
    Ok(ScanReport { entries })
}
