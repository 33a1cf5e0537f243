/// Сохранение выгрузок (CSV, PDF) в локальный каталог
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use contracts::shared::csv_export::{render_csv, render_table, CsvExportable};

use crate::shared::error::ApiError;

/// `registro_visitas_20240301_0915.csv`
pub fn timestamped_name(prefix: &str, extension: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.{}", prefix, now.format("%Y%m%d_%H%M"), extension)
}

/// Keeps only characters that are safe in a file name on every platform.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub struct Exporter {
    directory: PathBuf,
}

impl Exporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `bytes` as `file_name` inside the export directory.
    pub async fn save_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ApiError> {
        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            ApiError::Storage(format!("Failed to create {}: {}", self.directory.display(), e))
        })?;
        let path = self.directory.join(sanitize(file_name));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// CSV of `items`; an empty list still produces the header row.
    pub async fn write_csv<T: CsvExportable>(&self, file_name: &str, items: &[T]) -> Result<PathBuf, ApiError> {
        let content = render_csv(items).map_err(ApiError::Storage)?;
        self.save_bytes(file_name, content.as_bytes()).await
    }

    pub async fn write_table(
        &self,
        file_name: &str,
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> Result<PathBuf, ApiError> {
        let content = render_table(headers, rows).map_err(ApiError::Storage)?;
        self.save_bytes(file_name, content.as_bytes()).await
    }
}
