// src/report/journal.rs

use crate::error::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The plain-text scan log: one `<UTC timestamp> | <message>` entry per call,
/// appended to a file that is wiped at the start of every run.
#[derive(Debug, Clone)]
pub struct ScanJournal {
    path: PathBuf,
}

impl ScanJournal {
    /// Opens a fresh journal, deleting whatever the previous run left behind.
    pub fn reset(path: &Path) -> Result<Self> {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(Self { path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records a message. A failed write is logged but never stops the scan.
    pub fn record(&self, message: &str) {
        info!("{}", message);
        if let Err(e) = self.append(message) {
            warn!(path = %self.path.display(), error = %e, "Failed to write scan log.");
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{} | {}", Utc::now().format("%Y-%m-%d %H:%M:%S%.6f"), message)
    }
}
