//! Append-only JSONL sink for tool events.

use crate::traits::{AuditLogger, ToolEvent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum AuditLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct JsonlAuditLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlAuditLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuditLogError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn append(&self, event: &ToolEvent) -> Result<(), AuditLogError> {
        let line = serde_json::to_string(event)?;
        let mut file = self.file.lock();
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }
}

#[async_trait]
impl AuditLogger for JsonlAuditLogger {
    async fn log(&self, event: ToolEvent) {
        if let Err(e) = self.append(&event) {
            warn!(path = %self.path.display(), "Failed to record tool event: {}", e);
        }
    }
}
