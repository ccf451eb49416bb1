// src/core/scanner/mod.rs

pub mod headers_scanner;
pub mod http;
pub mod injection_scanner;
pub mod malware_scanner;
pub mod paths_scanner;
pub mod ssl_scanner;
pub mod status_scanner;

use crate::config::ScanConfig;
use crate::core::models::{ScanReport, SectionOutcome};
use crate::error::Result;
use crate::report::{html, ScanJournal};
use self::headers_scanner::run_headers_check;
use self::injection_scanner::run_injection_check;
use self::malware_scanner::run_malware_check;
use self::paths_scanner::run_sensitive_paths_check;
use self::ssl_scanner::run_ssl_check;
use self::status_scanner::run_status_check;
use tracing::{info, warn};

/// Runs every check against the configured target, one after another.
///
/// The reachability probe goes first. If the target cannot be fetched the
/// report only contains the Status entry and every other check is skipped.
/// Each outcome is written to `journal` as soon as it is known.
pub async fn run_full_scan(config: &ScanConfig, journal: &ScanJournal) -> Result<ScanReport> {
    let client = http::build_client(config)?;
    let mut report = ScanReport::new(&config.target_url);

    let record = |report: &mut ScanReport, outcome: SectionOutcome| {
        journal.record(&outcome.text);
        report.push(outcome);
    };

    let (page, status) = run_status_check(&client, config).await;
    record(&mut report, status);

    match page {
        Some(page) => {
            record(&mut report, run_headers_check(&page, config));
            record(&mut report, run_malware_check(&page, config));
            record(&mut report, run_sensitive_paths_check(&client, config).await);
            record(&mut report, run_injection_check(&client, config).await);
            record(&mut report, run_ssl_check(config).await);
        }
        None => warn!(target = %config.target_url, "Skipping remaining checks, target unreachable."),
    }

    report.finish();
    Ok(report)
}

/// One complete run: wipe the scan log, scan, then regenerate the HTML report.
pub async fn run_and_report(config: &ScanConfig) -> Result<ScanReport> {
    let journal = ScanJournal::reset(&config.log_file)?;
    journal.record("=== Security Scan Started ===");

    let report = run_full_scan(config, &journal).await?;

    journal.record("=== Security Scan Complete ===");
    html::generate(&report, &config.html_report)?;
    journal.record(&format!("HTML report saved to {}", config.html_report.display()));

    info!(
        target = %report.target,
        sections = report.sections.len(),
        "Scan run finished."
    );
    Ok(report)
}
