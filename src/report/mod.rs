// src/report/mod.rs

/// Regenerated static HTML report.
pub mod html;

/// Append-only plain text scan log.
pub mod journal;

pub use journal::ScanJournal;
