use crate::{LeadStore, ProfileRecord, ScraperError};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const EMERGENCY_BACKUP: &str = "emergency-backup.json";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SinkReport {
    /// Snapshot file written by this run.
    pub snapshot: Option<PathBuf>,
    /// Records newly added to the lead store; `None` when the store was skipped or failed.
    pub stored: Option<u64>,
}

/// Writes a run's records to a JSON snapshot first and to the lead store second.
pub struct Sink<S> {
    output_dir: PathBuf,
    store: Option<S>,
    snapshot: Option<PathBuf>,
}

impl<S: LeadStore> Sink<S> {
    pub fn new<P: AsRef<Path>>(output_dir: P, store: Option<S>) -> Sink<S> {
        Sink {
            output_dir: output_dir.as_ref().to_path_buf(),
            store,
            snapshot: None,
        }
    }

    pub fn emergency_path(&self) -> PathBuf {
        self.output_dir.join(EMERGENCY_BACKUP)
    }

    pub async fn persist(&mut self, records: &[ProfileRecord]) -> Result<SinkReport, ScraperError> {
        if records.is_empty() {
            info!("Nothing collected, nothing to save");
            return Ok(SinkReport::default());
        }

        let file_name = format!("leads-{}.json", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let snapshot = self.output_dir.join(file_name);
        write_json(&snapshot, records).await?;
        info!("Saved {} profile(s) to {}", records.len(), snapshot.display());
        self.snapshot = Some(snapshot.clone());

        let stored = match &self.store {
            Some(store) => match store.insert_many(records).await {
                Ok(n) => {
                    info!("Inserted {} new lead(s) into the store", n);
                    Some(n)
                }
                Err(e) => {
                    warn!("Lead store write failed, keeping {} only: {}", snapshot.display(), e);
                    None
                }
            },
            None => None,
        };

        Ok(SinkReport {
            snapshot: Some(snapshot),
            stored,
        })
    }

    /// Writes `emergency-backup.json` unless this run already has a snapshot on disk.
    pub async fn emergency_backup(
        &self,
        records: &[ProfileRecord],
    ) -> Result<Option<PathBuf>, ScraperError> {
        if records.is_empty() || self.snapshot.as_deref().map_or(false, Path::exists) {
            return Ok(None);
        }

        let path = self.emergency_path();
        write_json(&path, records).await?;
        warn!("Emergency backup of {} profile(s) written to {}", records.len(), path.display());
        Ok(Some(path))
    }

    /// Cleanup for every exit path: emergency backup, then store close.
    pub async fn finish(&mut self, records: &[ProfileRecord]) {
        if let Err(e) = self.emergency_backup(records).await {
            error!("Emergency backup failed: {}", e);
        }
        if let Some(store) = self.store.take() {
            store.close().await;
        }
    }
}

async fn write_json(path: &Path, records: &[ProfileRecord]) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
