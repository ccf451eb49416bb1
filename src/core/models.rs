// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// --- Reusable Result Types ---

// Outcome of a lookup that can succeed with or without data, or fail with a message.
pub type ScanResult<T> = Result<Option<T>, String>;

// --- Core Data Models ---

// An enumeration representing the severity level of a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

// A finding produced by a check: a severity, a knowledge-base code and,
// for checks that repeat over a list, the item it is about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisFinding {
    pub severity: Severity,
    pub code: String,
    pub subject: Option<String>,
}

impl AnalysisFinding {
    pub fn new(severity: Severity, code: &str) -> Self {
        Self { severity, code: code.to_string(), subject: None }
    }

    pub fn about(severity: Severity, code: &str, subject: &str) -> Self {
        Self { severity, code: code.to_string(), subject: Some(subject.to_string()) }
    }
}

/// The sections of a report, in the order the pipeline runs them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Section {
    #[strum(to_string = "Status")]
    Status,
    #[strum(to_string = "Headers")]
    Headers,
    #[strum(to_string = "Malware Scan")]
    MalwareScan,
    #[strum(to_string = "Sensitive Paths")]
    SensitivePaths,
    #[strum(to_string = "Injection Tests")]
    InjectionTests,
    #[strum(to_string = "SSL/TLS")]
    SslTls,
}

/// What one check concluded: the human-readable text plus structured findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionOutcome {
    pub section: Section,
    pub text: String,
    pub findings: Vec<AnalysisFinding>,
}

impl SectionOutcome {
    pub fn new(section: Section, text: impl Into<String>, findings: Vec<AnalysisFinding>) -> Self {
        Self { section, text: text.into(), findings }
    }

    /// A section is flagged when it carries anything more serious than Info.
    pub fn is_flagged(&self) -> bool {
        self.findings.iter().any(|f| f.severity != Severity::Info)
    }
}

// --- SSL/TLS Models ---

// Details extracted from the peer certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub subject_name: String,
    pub issuer_name: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SslData {
    pub is_valid: bool,
    pub certificate_info: CertificateInfo,
}

// --- Main Report ---

/// All section outcomes of one run, kept in pipeline order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub sections: Vec<SectionOutcome>,
}

impl ScanReport {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: SectionOutcome) {
        self.sections.push(outcome);
    }

    pub fn get(&self, section: Section) -> Option<&SectionOutcome> {
        self.sections.iter().find(|o| o.section == section)
    }

    pub fn findings(&self) -> impl Iterator<Item = &AnalysisFinding> {
        self.sections.iter().flat_map(|o| o.findings.iter())
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings().filter(|f| f.severity == severity).count()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn section_names_match_report_headings() {
        let names: Vec<String> = Section::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            ["Status", "Headers", "Malware Scan", "Sensitive Paths", "Injection Tests", "SSL/TLS"]
        );
    }

    #[test]
    fn info_findings_do_not_flag_a_section() {
        let quiet = SectionOutcome::new(
            Section::Headers,
            "Referrer-Policy: MISSING",
            vec![AnalysisFinding::about(Severity::Info, "HEADERS_REFERRER_POLICY_MISSING", "Referrer-Policy")],
        );
        assert!(!quiet.is_flagged());

        let loud = SectionOutcome::new(
            Section::SensitivePaths,
            "WARNING: http://x/.env is accessible (200) - block recommended",
            vec![AnalysisFinding::about(Severity::Critical, "PATH_EXPOSED", "http://x/.env")],
        );
        assert!(loud.is_flagged());
    }

    #[test]
    fn report_counts_findings_across_sections() {
        let mut report = ScanReport::new("http://x/");
        report.push(SectionOutcome::new(
            Section::Status,
            "Status code: 500",
            vec![AnalysisFinding::new(Severity::Warning, "STATUS_HTTP_ERROR")],
        ));
        report.push(SectionOutcome::new(
            Section::MalwareScan,
            "Suspicious patterns detected: eval(",
            vec![AnalysisFinding::about(Severity::Critical, "MALWARE_PATTERN_DETECTED", "eval(")],
        ));
        assert_eq!(report.count_by_severity(Severity::Critical), 1);
        assert_eq!(report.count_by_severity(Severity::Warning), 1);
        assert!(report.get(Section::Headers).is_none());
        assert_eq!(report.get(Section::Status).unwrap().text, "Status code: 500");
    }
}
