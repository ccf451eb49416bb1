// src/core/scanner/injection_scanner.rs

use super::http::{read_body, send};
use crate::config::ScanConfig;
use crate::core::models::{AnalysisFinding, Section, SectionOutcome, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

static RE_SQL_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(sql|mysql|syntax error)").unwrap());

/// Inspects the body returned for one payload. SQL error keywords and a
/// verbatim echo of the payload are reported independently.
pub fn inspect_response(payload: &str, body: &str) -> Vec<(String, AnalysisFinding)> {
    let mut hits = Vec::new();
    if RE_SQL_ERROR.is_match(body) {
        hits.push((
            format!("SQLi suspicion with payload: {} - block attempt", payload),
            AnalysisFinding::about(Severity::Critical, "INJECTION_SQLI_SUSPECTED", payload),
        ));
    }
    if body.contains(payload) {
        hits.push((
            format!("XSS/LFI reflection: {} - block attempt", payload),
            AnalysisFinding::about(Severity::Warning, "INJECTION_REFLECTION", payload),
        ));
    }
    hits
}

/// Sends each canned payload as the `q` query parameter and inspects the replies.
pub async fn run_injection_check(client: &Client, config: &ScanConfig) -> SectionOutcome {
    info!(payloads = config.payloads.len(), "Starting injection probes.");

    let mut lines = Vec::new();
    let mut findings = Vec::new();

    for payload in &config.payloads {
        let request = client.get(&config.target_url).query(&[("q", payload.as_str())]);
        if let Some(response) = send(request, &config.target_url).await {
            let body = read_body(response, &config.target_url).await;
            for (line, finding) in inspect_response(payload, &body) {
                warn!(payload = %payload, code = %finding.code, "Injection probe flagged.");
                lines.push(line);
                findings.push(finding);
            }
        } else {
            debug!(payload = %payload, "Injection probe got no response.");
        }
        tokio::time::sleep(config.delay()).await;
    }

    info!(flags = findings.len(), "Injection probes finished.");
    if lines.is_empty() {
        return SectionOutcome::new(Section::InjectionTests, "No injection issues detected", findings);
    }
    SectionOutcome::new(Section::InjectionTests, lines.join("\n"), findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflected_payload_is_flagged() {
        let payload = "<script>alert(1)</script>";
        let hits = inspect_response(payload, &format!("<p>You searched for {}</p>", payload));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "XSS/LFI reflection: <script>alert(1)</script> - block attempt");
        assert_eq!(hits[0].1.code, "INJECTION_REFLECTION");
    }

    #[test]
    fn sql_error_is_flagged() {
        let hits = inspect_response("' OR 1=1 --", "You have an error in your SQL Syntax near");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].0.starts_with("SQLi suspicion with payload: ' OR 1=1 --"));
    }

    #[test]
    fn clean_body_has_no_hits() {
        assert!(inspect_response("../../etc/passwd", "<html>ok</html>").is_empty());
    }
}
