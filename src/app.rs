// src/app.rs

use ratatui::widgets::ListState;
use std::path::PathBuf;
use vanguard_sentinel::core::models::{ScanReport, SectionOutcome, Severity};

pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub enum AppState {
    Disclaimer,
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub score: u8,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub flagged_sections: usize,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub scan_report: Option<ScanReport>,
    pub scan_error: Option<String>,
    pub summary: ScanSummary,
    pub section_list_state: ListState,
    pub spinner_frame: usize,
    pub report_path: PathBuf,
    default_target: String,
}

impl App {
    pub fn new(default_target: &str, report_path: PathBuf) -> Self {
        Self {
            should_quit: false,
            state: AppState::Disclaimer,
            input: default_target.to_string(),
            scan_report: None,
            scan_error: None,
            summary: ScanSummary::default(),
            section_list_state: ListState::default(),
            spinner_frame: 0,
            report_path,
            default_target: default_target.to_string(),
        }
    }

    pub fn acknowledge_disclaimer(&mut self) {
        self.state = AppState::Idle;
    }

    pub fn on_tick(&mut self) {
        if matches!(self.state, AppState::Scanning) {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    /// Stores the outcome of a finished scan and selects its first section.
    pub fn finish_scan(&mut self, result: Result<ScanReport, String>) {
        match result {
            Ok(report) => {
                self.scan_error = None;
                self.scan_report = Some(report);
                self.section_list_state.select(Some(0));
            }
            Err(e) => {
                self.scan_error = Some(e);
                self.scan_report = None;
                self.section_list_state.select(None);
            }
        }
        self.state = AppState::Finished;
        self.update_summary();
    }

    pub fn sections(&self) -> &[SectionOutcome] {
        self.scan_report.as_ref().map(|r| r.sections.as_slice()).unwrap_or(&[])
    }

    pub fn selected_section(&self) -> Option<&SectionOutcome> {
        self.section_list_state.selected().and_then(|i| self.sections().get(i))
    }

    pub fn select_previous(&mut self) {
        if self.sections().is_empty() {
            return;
        }
        let i = self.section_list_state.selected().unwrap_or(0).saturating_sub(1);
        self.section_list_state.select(Some(i));
    }

    pub fn select_next(&mut self) {
        let len = self.sections().len();
        if len == 0 {
            return;
        }
        let i = self.section_list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.section_list_state.select(Some(i));
    }

    pub fn update_summary(&mut self) {
        self.summary = match &self.scan_report {
            Some(report) => {
                let criticals = report.count_by_severity(Severity::Critical);
                let warnings = report.count_by_severity(Severity::Warning);
                let score = 100_i16
                    .saturating_sub((criticals * 15) as i16)
                    .saturating_sub((warnings * 5) as i16);
                ScanSummary {
                    score: score.max(0) as u8,
                    critical_issues: criticals,
                    warning_issues: warnings,
                    flagged_sections: report.sections.iter().filter(|s| s.is_flagged()).count(),
                }
            }
            None => ScanSummary::default(),
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = self.default_target.clone();
        self.scan_report = None;
        self.scan_error = None;
        self.summary = ScanSummary::default();
        self.section_list_state = ListState::default();
        self.spinner_frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanguard_sentinel::core::models::{AnalysisFinding, Section};

    fn finished_app() -> App {
        let mut report = ScanReport::new("https://example.com/");
        report.push(SectionOutcome::new(Section::Status, "Status code: 200", Vec::new()));
        report.push(SectionOutcome::new(
            Section::SensitivePaths,
            "WARNING: https://example.com/.env is accessible (200) - block recommended",
            vec![AnalysisFinding::about(Severity::Critical, "PATH_EXPOSED", "https://example.com/.env")],
        ));
        report.push(SectionOutcome::new(
            Section::Headers,
            "Content-Security-Policy: MISSING",
            vec![AnalysisFinding::about(
                Severity::Warning,
                "HEADERS_CONTENT_SECURITY_POLICY_MISSING",
                "Content-Security-Policy",
            )],
        ));
        let mut app = App::new("https://example.com/", PathBuf::from("report.html"));
        app.finish_scan(Ok(report));
        app
    }

    #[test]
    fn summary_scores_findings() {
        let app = finished_app();
        assert_eq!(app.summary.critical_issues, 1);
        assert_eq!(app.summary.warning_issues, 1);
        assert_eq!(app.summary.score, 80);
        assert_eq!(app.summary.flagged_sections, 2);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut app = finished_app();
        app.select_previous();
        assert_eq!(app.section_list_state.selected(), Some(0));
        for _ in 0..10 {
            app.select_next();
        }
        assert_eq!(app.section_list_state.selected(), Some(2));
        assert_eq!(app.selected_section().unwrap().section, Section::Headers);
    }

    #[test]
    fn reset_restores_default_target() {
        let mut app = finished_app();
        app.input.push_str("extra");
        app.reset();
        assert_eq!(app.input, "https://example.com/");
        assert!(app.scan_report.is_none());
        assert!(matches!(app.state, AppState::Idle));
    }

    #[test]
    fn failed_scan_keeps_error() {
        let mut app = App::new("https://example.com/", PathBuf::from("report.html"));
        app.finish_scan(Err("HTTP client error".to_string()));
        assert_eq!(app.scan_error.as_deref(), Some("HTTP client error"));
        assert!(app.selected_section().is_none());
    }
}
