// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Renders the summary panel: score, gauge, per-section pass/fail and issue counts.
/// Empty until a scan has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & Rating section
            Constraint::Length(1), // Gauge chart
            Constraint::Length(1), // Spacer
            Constraint::Length(7), // Security Checks section
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Issues Found section
        ])
        .split(area);

    if !matches!(app.state, AppState::Finished) || app.scan_report.is_none() {
        return;
    }

    // --- Score & Rating Section ---
    let (rating_text, rating_style) = match app.summary.score {
        90..=100 => ("Excellent", Style::default().fg(Color::Green)),
        75..=89 => ("Good", Style::default().fg(Color::Cyan)),
        50..=74 => ("Needs Improvement", Style::default().fg(Color::Yellow)),
        _ => ("Poor", Style::default().fg(Color::Red)),
    };
    let score_line = Line::from(format!("{}/100 ({})", app.summary.score, rating_text)).style(rating_style);
    let score_text = Text::from(vec![Line::from("Overall Score".bold()), score_line]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    let score_gauge = Gauge::default()
        .percent(app.summary.score as u16)
        .label("")
        .style(Style::default().fg(
            if app.summary.score >= 80 { Color::Green }
            else if app.summary.score >= 50 { Color::Yellow }
            else { Color::Red }
        ));
    frame.render_widget(score_gauge, summary_chunks[1]);

    // --- Security Checks Section ---
    let checks_block = Block::default().title("SECURITY CHECKS".bold());
    let checks_lines: Vec<Line> = app
        .sections()
        .iter()
        .map(|outcome| {
            let (icon, style) = if outcome.is_flagged() {
                ("✗", Style::default().fg(Color::Red))
            } else {
                ("✓", Style::default().fg(Color::Green))
            };
            Line::from(vec![
                Span::styled(format!("{} ", icon), style),
                Span::raw(outcome.section.to_string()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(checks_lines).block(checks_block), summary_chunks[3]);

    // --- Issue Details Section ---
    let issues_block = Block::default().title("ISSUES FOUND".bold());
    let details_text = Text::from(vec![
        Line::from(vec![
            Span::raw("Critical: "),
            Span::styled(app.summary.critical_issues.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::raw("Warnings: "),
            Span::styled(app.summary.warning_issues.to_string(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("Flagged sections: "),
            Span::raw(app.summary.flagged_sections.to_string()),
        ]),
    ]);
    frame.render_widget(Paragraph::new(details_text).block(issues_block), summary_chunks[5]);
}
