//! Retention sweep over stored uploads and results.

use chrono::{DateTime, Utc};
use std::path::Path;

pub const DEFAULT_RETENTION_DAYS: u64 = 120;

/// Folders under the storage root that the sweep walks
pub const SWEPT_FOLDERS: [&str; 2] = ["uploads", "results"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub deleted: usize,
    pub failed: usize,
}

/// Delete stored files older than `days` days
pub fn sweep(root: &Path, days: u64) -> SweepSummary {
    let cutoff = i64::try_from(days)
        .ok()
        .and_then(chrono::Duration::try_days)
        .and_then(|age| Utc::now().checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    sweep_older_than(root, cutoff)
}

/// Delete stored files last modified before `cutoff`. Failures are logged
/// per file and never stop the sweep.
pub fn sweep_older_than(root: &Path, cutoff: DateTime<Utc>) -> SweepSummary {
    let mut summary = SweepSummary::default();

    for folder in SWEPT_FOLDERS {
        let dir = root.join(folder);
        if !dir.is_dir() {
            continue;
        }

        let pattern = format!(
            "{}/*",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let entries = match glob::glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "Invalid sweep pattern: {}", e);
                continue;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("Unreadable entry during sweep: {}", e);
                    summary.failed += 1;
                    continue;
                }
            };

            match remove_if_stale(&path, cutoff) {
                Ok(true) => summary.deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to sweep file: {}", e);
                    summary.failed += 1;
                }
            }
        }
    }

    tracing::info!(
        deleted = summary.deleted,
        failed = summary.failed,
        "Retention sweep finished"
    );
    summary
}

fn remove_if_stale(path: &Path, cutoff: DateTime<Utc>) -> std::io::Result<bool> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Ok(false);
    }

    let modified: DateTime<Utc> = metadata.modified()?.into();
    if modified >= cutoff {
        return Ok(false);
    }

    std::fs::remove_file(path)?;
    Ok(true)
}
