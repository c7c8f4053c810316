use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use habitual_core::category::Category;
use habitual_core::stats::StatsOverview;
use habitual_core::Habit;
use serde::{Deserialize, Serialize};

/// Everything the client currently holds in memory, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub habits: Vec<Habit>,
    pub categories: Vec<Category>,
    pub stats: Option<StatsOverview>,
    pub exported_at: String,
}

impl ExportSnapshot {
    pub fn new(
        habits: Vec<Habit>,
        categories: Vec<Category>,
        stats: Option<StatsOverview>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            habits,
            categories,
            stats,
            exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("habit-tracker-export-{}.json", now.format("%Y-%m-%d"))
}

/// Write the snapshot into `dir`, creating it if needed. Returns the file path.
pub fn write_export(dir: &Path, snapshot: &ExportSnapshot, now: DateTime<Utc>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(now));
    let json = serde_json::to_string_pretty(snapshot).context("failed to serialize export")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
