use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::merge::MergeReport;

/// Extensions kept for stored data files; anything else is stored as xlsx
const KNOWN_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Report as persisted next to a job's result file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub job_id: String,
    pub created_at: String,
    pub result_file: String,
    pub result_checksum: String,
    #[serde(flatten)]
    pub report: MergeReport,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout of uploads and results, keyed by job id
#[derive(Debug, Clone)]
pub struct JobStore {
    root: PathBuf,
}

impl JobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JobStore { root: root.into() }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    /// Create the uploads and results folders
    pub async fn init(&self) -> Result<(), StorageError> {
        for dir in [self.uploads_dir(), self.results_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|source| StorageError::Io { path: dir.clone(), source })?;
        }
        Ok(())
    }

    pub fn new_job_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub async fn save_template(&self, job_id: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.uploads_dir().join(format!("{}__template.xlsx", job_id));
        write_file(&path, bytes).await?;
        Ok(path)
    }

    pub async fn save_data_file(
        &self,
        job_id: &str,
        index: usize,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let ext = data_extension(original_name);
        let path = self
            .uploads_dir()
            .join(format!("{}__data_{}.{}", job_id, index, ext));
        write_file(&path, bytes).await?;
        Ok(path)
    }

    pub async fn save_result(
        &self,
        job_id: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let path = self.results_dir().join(format!("{}__{}", job_id, filename));
        write_file(&path, bytes).await?;
        Ok(path)
    }

    pub async fn save_report(&self, report: &StoredReport) -> Result<PathBuf, StorageError> {
        let path = self.report_path(&report.job_id);
        let json = serde_json::to_vec_pretty(report)?;
        write_file(&path, &json).await?;
        Ok(path)
    }

    /// Stored report of a job, `None` when the id is unknown or malformed
    pub async fn load_report(&self, job_id: &str) -> Result<Option<serde_json::Value>, StorageError> {
        if !is_valid_job_id(job_id) {
            return Ok(None);
        }

        let path = self.report_path(job_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn report_path(&self, job_id: &str) -> PathBuf {
        self.results_dir().join(format!("{}__report.json", job_id))
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| StorageError::Io { path: path.to_path_buf(), source })
}

/// Job ids are simple-form UUIDs; anything else never reaches the filesystem
pub fn is_valid_job_id(job_id: &str) -> bool {
    !job_id.is_empty() && job_id.len() <= 64 && job_id.chars().all(|c| c.is_ascii_hexdigit())
}

fn data_extension(original_name: Option<&str>) -> &'static str {
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    KNOWN_EXTENSIONS
        .iter()
        .find(|known| ext.as_deref() == Some(**known))
        .copied()
        .unwrap_or("xlsx")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(job_id: &str) -> StoredReport {
        StoredReport {
            job_id: job_id.to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            result_file: "Karimova_D.B..xlsx".to_string(),
            result_checksum: "00".to_string(),
            report: MergeReport {
                teacher_short: "Каримова Д.Б.".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_job_ids() {
        let id = JobStore::new_job_id();
        assert_eq!(id.len(), 32);
        assert!(is_valid_job_id(&id));
        assert!(!is_valid_job_id(""));
        assert!(!is_valid_job_id("../etc/passwd"));
        assert!(!is_valid_job_id("abc__report"));
    }

    #[test]
    fn test_data_extension() {
        assert_eq!(data_extension(Some("5-A.XLS")), "xls");
        assert_eq!(data_extension(Some("jurnal.ods")), "ods");
        assert_eq!(data_extension(Some("jurnal.csv")), "xlsx");
        assert_eq!(data_extension(Some("jurnal")), "xlsx");
        assert_eq!(data_extension(None), "xlsx");
    }

    #[tokio::test]
    async fn test_files_land_under_job_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path());
        store.init().await.unwrap();

        let template = store.save_template("abc123", b"tpl").await.unwrap();
        let data = store
            .save_data_file("abc123", 2, Some("5-B.xls"), b"data")
            .await
            .unwrap();
        let result = store
            .save_result("abc123", "Karimova_D.B..xlsx", b"out")
            .await
            .unwrap();

        assert_eq!(template, dir.path().join("uploads/abc123__template.xlsx"));
        assert_eq!(data, dir.path().join("uploads/abc123__data_2.xls"));
        assert_eq!(result, dir.path().join("results/abc123__Karimova_D.B..xlsx"));
        assert_eq!(std::fs::read(&data).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_report_round_trip_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path());
        store.init().await.unwrap();

        let path = store.save_report(&sample_report("abc123")).await.unwrap();
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("Каримова Д.Б."));

        let loaded = store.load_report("abc123").await.unwrap().unwrap();
        assert_eq!(loaded["teacher_short"], "Каримова Д.Б.");
        assert_eq!(loaded["job_id"], "abc123");
        assert_eq!(loaded["classes"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_reports_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path());
        store.init().await.unwrap();

        assert!(store.load_report("abc123").await.unwrap().is_none());
        assert!(store.load_report("../../secret").await.unwrap().is_none());
    }
}
