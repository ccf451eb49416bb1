// src/core/scanner/paths_scanner.rs

use super::http::fetch;
use crate::config::ScanConfig;
use crate::core::models::{AnalysisFinding, Section, SectionOutcome, Severity};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

/// Joins the target and a sensitive path without doubling the slash.
pub fn path_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Turns the status of one sensitive-path probe into a report line.
/// `None` means the probe never got an answer.
pub fn classify_path(url: &str, status: Option<StatusCode>) -> (String, Option<AnalysisFinding>) {
    let Some(status) = status else {
        return (format!("Could not connect to {}", url), None);
    };
    match status.as_u16() {
        200 => (
            format!("WARNING: {} is accessible (200) - block recommended", url),
            Some(AnalysisFinding::about(Severity::Critical, "PATH_EXPOSED", url)),
        ),
        code @ (401 | 403) => (format!("Protected: {} ({})", url, code), None),
        404 => (format!("Not found: {}", url), None),
        code => (format!("{} returned {}", url, code), None),
    }
}

/// Probes every configured sensitive path, pausing between requests.
pub async fn run_sensitive_paths_check(client: &Client, config: &ScanConfig) -> SectionOutcome {
    info!(paths = config.sensitive_paths.len(), "Starting sensitive path sweep.");

    let mut lines = Vec::with_capacity(config.sensitive_paths.len());
    let mut findings = Vec::new();

    for path in &config.sensitive_paths {
        let url = path_url(&config.target_url, path);
        let status = fetch(client, &url).await.map(|r| r.status());
        let (line, finding) = classify_path(&url, status);
        debug!(url = %url, result = %line, "Sensitive path probed.");
        if let Some(finding) = finding {
            warn!(url = %url, "Sensitive path is publicly accessible.");
            findings.push(finding);
        }
        lines.push(line);
        tokio::time::sleep(config.delay()).await;
    }

    info!(exposed = findings.len(), "Sensitive path sweep finished.");
    SectionOutcome::new(Section::SensitivePaths, lines.join("\n"), findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slash() {
        assert_eq!(path_url("https://x.dev/", "/.env"), "https://x.dev/.env");
        assert_eq!(path_url("https://x.dev", "/admin"), "https://x.dev/admin");
    }

    #[test]
    fn classifies_by_status() {
        let url = "https://x.dev/admin";

        let (line, finding) = classify_path(url, Some(StatusCode::OK));
        assert!(line.starts_with("WARNING: "));
        assert_eq!(finding.unwrap().code, "PATH_EXPOSED");

        let (line, finding) = classify_path(url, Some(StatusCode::FORBIDDEN));
        assert_eq!(line, "Protected: https://x.dev/admin (403)");
        assert!(finding.is_none());

        let (line, _) = classify_path(url, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(line, "Protected: https://x.dev/admin (401)");

        let (line, _) = classify_path(url, Some(StatusCode::NOT_FOUND));
        assert_eq!(line, "Not found: https://x.dev/admin");

        let (line, _) = classify_path(url, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(line, "https://x.dev/admin returned 500");

        let (line, finding) = classify_path(url, None);
        assert_eq!(line, "Could not connect to https://x.dev/admin");
        assert!(finding.is_none());
    }
}
