// Plain-text report files
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::delivery::{ReportBatch, ReportSink};
use crate::errors::{ReportError, Result};

/// Writes each report in a batch to `{dir}/{name}_{YYYYMMDD}.txt`
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str, stamp: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.txt", name, stamp))
    }
}

#[async_trait]
impl ReportSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn deliver(&self, batch: &ReportBatch) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ReportError::DeliveryError(format!("Cannot create {}: {}", self.dir.display(), e))
        })?;

        let stamp = batch.stamp();
        for report in &batch.reports {
            let path = self.path_for(&report.name, &stamp);
            tokio::fs::write(&path, &report.content)
                .await
                .map_err(|e| ReportError::DeliveryError(format!("Cannot write {}: {}", path.display(), e)))?;
            info!(path = %path.display(), "Saved report");
        }
        Ok(())
    }
}

/// Save a single report; without a file name it becomes `report_{YYYYMMDD_HHMMSS}.txt` in `dir`
pub fn save_report(dir: &Path, content: &str, filename: Option<&Path>) -> Result<PathBuf> {
    let path = match filename {
        Some(name) if name.is_absolute() => name.to_path_buf(),
        Some(name) => dir.join(name),
        None => dir.join(format!("report_{}.txt", Local::now().format("%Y%m%d_%H%M%S"))),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    Ok(path)
}
