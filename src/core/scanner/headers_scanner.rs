// src/core/scanner/headers_scanner.rs

use super::http::PageSnapshot;
use crate::config::ScanConfig;
use crate::core::knowledge_base::{get_finding_detail, missing_header_code};
use crate::core::models::{AnalysisFinding, Section, SectionOutcome, Severity};
use reqwest::header::HeaderMap;
use tracing::{debug, info, warn};

/// Looks up a header, returning its value when present and non-empty.
/// Non-UTF-8 values are reported with a placeholder rather than dropped.
fn check_header(headers: &HeaderMap, name: &str) -> Option<String> {
    debug!(header_name = name, "Checking for header.");
    let value = headers.get(name)?;
    match value.to_str() {
        Ok(s) if s.trim().is_empty() => {
            debug!(header_name = name, "Header present but empty.");
            None
        }
        Ok(s) => {
            debug!(header_name = name, value = s, "Header found.");
            Some(s.to_string())
        }
        Err(_) => {
            warn!(header_name = name, "Header found but contained invalid UTF-8.");
            Some("[Invalid UTF-8]".to_string())
        }
    }
}

/// Audits the configured security headers on the homepage response.
///
/// Produces one line per configured header, `<name>: <value>` or
/// `<name>: MISSING`, in configuration order. Every missing header also
/// yields a finding whose severity comes from the knowledge base.
pub fn run_headers_check(page: &PageSnapshot, config: &ScanConfig) -> SectionOutcome {
    info!(headers = config.security_headers.len(), "Starting headers audit.");

    let mut lines = Vec::with_capacity(config.security_headers.len());
    let mut findings = Vec::new();

    for name in &config.security_headers {
        match check_header(&page.headers, name) {
            Some(value) => lines.push(format!("{}: {}", name, value)),
            None => {
                lines.push(format!("{}: MISSING", name));
                let code = missing_header_code(name);
                let severity = get_finding_detail(&code)
                    .map(|d| d.severity)
                    .unwrap_or(Severity::Info);
                findings.push(AnalysisFinding::about(severity, &code, name));
            }
        }
    }

    info!(missing = findings.len(), "Headers audit finished.");
    SectionOutcome::new(Section::Headers, lines.join("\n"), findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};
    use reqwest::StatusCode;

    fn page_with(headers: &[(&'static str, &'static str)]) -> PageSnapshot {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        PageSnapshot {
            url: "https://example.com/".to_string(),
            status: StatusCode::OK,
            headers: map,
            body: String::new(),
        }
    }

    #[test]
    fn reports_one_line_per_header() {
        let page = page_with(&[
            ("strict-transport-security", "max-age=31536000"),
            ("x-frame-options", "DENY"),
        ]);
        let outcome = run_headers_check(&page, &ScanConfig::default());
        let lines: Vec<&str> = outcome.text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Strict-Transport-Security: max-age=31536000");
        assert_eq!(lines[1], "Content-Security-Policy: MISSING");
        assert_eq!(lines[2], "X-Frame-Options: DENY");
        for (line, name) in lines.iter().zip(&ScanConfig::default().security_headers) {
            assert!(line.starts_with(&format!("{}: ", name)));
        }
    }

    #[test]
    fn missing_headers_become_findings() {
        let outcome = run_headers_check(&page_with(&[]), &ScanConfig::default());
        assert_eq!(outcome.findings.len(), 6);
        assert!(outcome.is_flagged());

        let csp = outcome
            .findings
            .iter()
            .find(|f| f.subject.as_deref() == Some("Content-Security-Policy"))
            .unwrap();
        assert_eq!(csp.severity, Severity::Warning);
        assert_eq!(csp.code, "HEADERS_CONTENT_SECURITY_POLICY_MISSING");
    }

    #[test]
    fn empty_header_counts_as_missing() {
        let page = page_with(&[("referrer-policy", "")]);
        let outcome = run_headers_check(&page, &ScanConfig::default());
        assert!(outcome.text.contains("Referrer-Policy: MISSING"));
    }
}
