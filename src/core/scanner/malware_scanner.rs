// src/core/scanner/malware_scanner.rs

use super::http::PageSnapshot;
use crate::config::ScanConfig;
use crate::core::models::{AnalysisFinding, Section, SectionOutcome, Severity};
use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

/// Compiles a fragment into a case-insensitive literal matcher.
/// Fragments such as `eval(` are not valid regexes on their own, so they are escaped.
fn compile_fragment(fragment: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(fragment))
        .case_insensitive(true)
        .build()
        .map_err(|e| warn!(fragment, error = %e, "Skipping malware fragment."))
        .ok()
}

/// Returns the configured fragments found in `body`, in configuration order.
pub fn find_suspicious_patterns<'a>(body: &str, patterns: &'a [String]) -> Vec<&'a str> {
    patterns
        .iter()
        .filter(|p| compile_fragment(p).is_some_and(|re| re.is_match(body)))
        .map(String::as_str)
        .collect()
}

/// Greps the homepage body for code-execution fragments.
pub fn run_malware_check(page: &PageSnapshot, config: &ScanConfig) -> SectionOutcome {
    info!(patterns = config.malware_patterns.len(), "Starting static content scan.");

    let found = find_suspicious_patterns(&page.body, &config.malware_patterns);
    debug!(matches = ?found, "Static content scan matches.");

    if found.is_empty() {
        info!("No suspicious patterns found.");
        return SectionOutcome::new(Section::MalwareScan, "No suspicious patterns found", Vec::new());
    }

    warn!(matches = found.len(), "Suspicious patterns detected in homepage.");
    let findings = found
        .iter()
        .map(|p| AnalysisFinding::about(Severity::Critical, "MALWARE_PATTERN_DETECTED", p))
        .collect();
    let text = format!("Suspicious patterns detected: {}", found.join(", "));
    SectionOutcome::new(Section::MalwareScan, text, findings)
}
