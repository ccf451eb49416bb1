// src/core/scanner/status_scanner.rs

use super::http::{fetch, PageSnapshot};
use crate::config::ScanConfig;
use crate::core::models::{AnalysisFinding, Section, SectionOutcome, Severity};
use reqwest::Client;
use tracing::{info, warn};

/// Fetches the target once. The snapshot is `None` when the site is
/// unreachable, which tells the pipeline to skip every dependent check.
pub async fn run_status_check(client: &Client, config: &ScanConfig) -> (Option<PageSnapshot>, SectionOutcome) {
    info!(target = %config.target_url, "Starting reachability check.");

    let Some(response) = fetch(client, &config.target_url).await else {
        warn!(target = %config.target_url, "Target unreachable.");
        let outcome = SectionOutcome::new(
            Section::Status,
            "ERROR: Website not reachable",
            vec![AnalysisFinding::new(Severity::Critical, "STATUS_UNREACHABLE")],
        );
        return (None, outcome);
    };

    let page = PageSnapshot::capture(response, &config.target_url).await;
    let mut findings = Vec::new();
    if page.status.is_client_error() || page.status.is_server_error() {
        findings.push(AnalysisFinding::new(Severity::Warning, "STATUS_HTTP_ERROR"));
    }

    let text = format!("Status code: {}", page.status.as_u16());
    info!(status = %page.status, "Reachability check finished.");
    (Some(page), SectionOutcome::new(Section::Status, text, findings))
}
