// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use vanguard_sentinel::core::knowledge_base;
use vanguard_sentinel::core::models::{SectionOutcome, Severity};

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Scan Report (Navigate with ↑ ↓)");

    if !matches!(app.state, AppState::Finished) {
        let content = match app.state {
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw("Scanning... Probes are sent one at a time."),
                ]))
                .alignment(Alignment::Center)
            }
            _ => Paragraph::new("Scan results will appear here...").alignment(Alignment::Center),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    if let Some(error) = &app.scan_error {
        let p = Paragraph::new(vec![
            Line::from("Scan could not run".red().bold()),
            Line::from(""),
            Line::from(error.as_str()),
        ])
        .wrap(Wrap { trim: true })
        .block(main_block);
        frame.render_widget(p, area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(inner_area);

    let items: Vec<ListItem> = app
        .sections()
        .iter()
        .map(|outcome| {
            let (marker, style) = if outcome.is_flagged() {
                ("✗ ", Style::default().fg(Color::Red))
            } else {
                ("✓ ", Style::default().fg(Color::Green))
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(outcome.section.to_string(), style),
            ]))
        })
        .collect();

    let sections_list = List::new(items)
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(sections_list, chunks[0], &mut app.section_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    let text = match app.selected_section() {
        Some(outcome) => detail_text(outcome),
        None => Text::from("Select a section above to see details."),
    };
    let p = Paragraph::new(text).wrap(Wrap { trim: false }).block(detail_block);
    frame.render_widget(p, chunks[1]);
}

fn detail_text(outcome: &SectionOutcome) -> Text<'static> {
    let text_style = if outcome.is_flagged() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let mut lines: Vec<Line<'static>> = outcome
        .text
        .lines()
        .map(|l| Line::styled(l.to_string(), text_style))
        .collect();

    for finding in &outcome.findings {
        let Some(detail) = knowledge_base::get_finding_detail(&finding.code) else {
            continue;
        };
        let title_style = match finding.severity {
            Severity::Critical => Style::default().fg(Color::Red).bold(),
            Severity::Warning => Style::default().fg(Color::Yellow).bold(),
            Severity::Info => Style::default().fg(Color::Cyan).bold(),
        };
        let title = match &finding.subject {
            Some(subject) => format!("[{}] {} ({})", detail.category, detail.title, subject),
            None => format!("[{}] {}", detail.category, detail.title),
        };

        lines.push(Line::from(""));
        lines.push(Line::styled(title, title_style));
        lines.push(Line::from("WHAT IT IS:".yellow().bold()));
        lines.push(Line::from(detail.description));
        lines.push(Line::from("HOW TO FIX:".yellow().bold()));
        lines.push(Line::from(detail.remediation));
    }

    Text::from(lines)
}
