// src/core/mod.rs

/// Data structures shared by the scanner, the reports and the console,
/// such as `ScanReport`, `SectionOutcome` and `Severity`.
pub mod models;

/// The sequential scan pipeline and its individual checks.
pub mod scanner;

/// Human-readable details and remediation for every finding code.
pub mod knowledge_base;
