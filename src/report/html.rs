//! HTML report generation using Tera templates

use crate::core::knowledge_base::get_finding_detail;
use crate::core::models::{ScanReport, SectionOutcome, Severity};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};
use tracing::info;

#[derive(Serialize)]
struct FindingView {
    severity: &'static str,
    category: String,
    title: String,
    subject: Option<String>,
    remediation: &'static str,
}

#[derive(Serialize)]
struct SectionView {
    name: String,
    color: &'static str,
    text: String,
    findings: Vec<FindingView>,
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical",
        Severity::Warning => "Warning",
        Severity::Info => "Info",
    }
}

fn section_view(outcome: &SectionOutcome) -> SectionView {
    let findings = outcome
        .findings
        .iter()
        .map(|f| {
            let detail = get_finding_detail(&f.code);
            FindingView {
                severity: severity_label(f.severity),
                category: detail.map(|d| d.category.to_string()).unwrap_or_default(),
                title: detail.map(|d| d.title.to_string()).unwrap_or_else(|| f.code.clone()),
                subject: f.subject.clone(),
                remediation: detail.map(|d| d.remediation).unwrap_or(""),
            }
        })
        .collect();

    SectionView {
        name: outcome.section.to_string(),
        color: if outcome.is_flagged() { "red" } else { "black" },
        text: outcome.text.clone(),
        findings,
    }
}

/// Renders the report to an HTML string. All scan text is escaped.
pub fn render(report: &ScanReport) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("report.html", default_template())?;

    let sections: Vec<SectionView> = report.sections.iter().map(section_view).collect();
    let scanned_at = report.finished_at.unwrap_or(report.started_at);

    let mut context = Context::new();
    context.insert("target", &report.target);
    context.insert("scanned_at", &scanned_at.format("%Y-%m-%d %H:%M:%S").to_string());
    context.insert("sections", &sections);
    context.insert("critical_count", &report.count_by_severity(Severity::Critical));
    context.insert("warning_count", &report.count_by_severity(Severity::Warning));
    context.insert("version", env!("CARGO_PKG_VERSION"));

    Ok(tera.render("report.html", &context)?)
}

/// Regenerates the HTML report at `output_path`.
pub fn generate(report: &ScanReport, output_path: &Path) -> Result<()> {
    let rendered = render(report)?;
    std::fs::write(output_path, rendered)?;
    info!("HTML report saved to {}", output_path.display());
    Ok(())
}

fn default_template() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Security Scan Report</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 2em; color: #1e293b; }
        pre { background: #f8fafc; padding: 1em; border-radius: 6px; white-space: pre-wrap; }
        .finding { margin: 0.3em 0; }
        .Critical { color: #b91c1c; font-weight: bold; }
        .Warning { color: #b45309; font-weight: bold; }
        .Info { color: #0369a1; }
        footer { margin-top: 3em; color: #64748b; font-size: 0.85em; }
    </style>
</head>
<body>
    <h1>Security Scan Report</h1>
    <p>Target: {{ target }}</p>
    <p>Scanned: {{ scanned_at }} UTC</p>
    <p>Critical: {{ critical_count }} &middot; Warnings: {{ warning_count }}</p>
    {% for section in sections %}
    <h2>{{ section.name }}</h2>
    <pre style="color:{{ section.color }}">{{ section.text }}</pre>
    {% for finding in section.findings %}
    <div class="finding"><span class="{{ finding.severity }}">[{{ finding.severity }}]</span> {% if finding.category %}{{ finding.category }}: {% endif %}{{ finding.title }}{% if finding.subject %} ({{ finding.subject }}){% endif %}{% if finding.remediation %}: {{ finding.remediation }}{% endif %}</div>
    {% endfor %}
    {% endfor %}
    <footer>Generated by Vanguard Sentinel v{{ version }}</footer>
</body>
</html>
"#
}
