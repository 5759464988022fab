//! Prediction result view.

use std::path::Path;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Assessment, DiagnosisLabel};
use crate::tui::styles::CardioTheme;

/// Outcome line shown under the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Result screen state: one assessment and its prepared report.
#[derive(Debug, Clone)]
pub struct ResultState {
    pub assessment: Assessment,
    /// Rendered report, or `None` if it could not be built.
    pub report: Option<Vec<u8>>,
    pub notice: Option<Notice>,
}

impl ResultState {
    #[must_use]
    pub fn new(assessment: Assessment, report: Option<Vec<u8>>) -> Self {
        let notice = report
            .is_none()
            .then(|| Notice::Error("Report unavailable".to_string()));
        Self {
            assessment,
            report,
            notice,
        }
    }
}

/// Render the result screen
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState, report_path: &Path) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_prediction(f, body[0], &state.assessment);
    render_inputs(f, body[1], &state.assessment);

    render_result_footer(f, chunks[2], state, report_path);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", CardioTheme::text()),
        Span::styled("Prediction Results", CardioTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(CardioTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_prediction(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let block = Block::default()
        .title(Span::styled(" Prediction ", CardioTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(CardioTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Label
            Constraint::Length(2), // Probability
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Tier
            Constraint::Min(0),    // Guidance
        ])
        .margin(1)
        .split(inner);

    let level = assessment.risk_level();
    let risk_style = CardioTheme::risk_level(level);
    let probability = assessment.result.probability;

    let icon = match assessment.result.label {
        DiagnosisLabel::DiseaseDetected => "✖",
        DiagnosisLabel::NoDisease => "✔",
    };
    let label = Paragraph::new(Line::from(vec![
        Span::styled(format!("{icon} "), risk_style),
        Span::styled(
            assessment.result.label.to_string(),
            CardioTheme::title(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    let prob = Paragraph::new(Line::from(vec![
        Span::styled("Risk Probability: ", CardioTheme::text_secondary()),
        Span::styled(format!("{:.2}%", probability * 100.0), CardioTheme::text()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(prob, chunks[1]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Level ", CardioTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(CardioTheme::border()),
        )
        .gauge_style(risk_style)
        .ratio(probability.clamp(0.0, 1.0))
        .label(format!("{:.2}%", probability * 100.0));
    f.render_widget(gauge, chunks[2]);

    let tier = Paragraph::new(Line::from(vec![
        Span::styled(
            level.to_string(),
            risk_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {}", level.description()), CardioTheme::text_secondary()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(tier, chunks[3]);

    let guidance = Paragraph::new(vec![
        Line::from(Span::styled("What This Means", CardioTheme::subtitle())),
        Line::from(Span::styled(level.guidance(), risk_style)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(guidance, chunks[4]);
}

fn render_inputs(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let lines: Vec<Line> = assessment
        .record
        .summary()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label}: "), CardioTheme::text_secondary()),
                Span::styled(value, CardioTheme::text()),
            ])
        })
        .collect();

    let inputs = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Input Parameters ", CardioTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(CardioTheme::border()),
    );
    f.render_widget(inputs, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState, report_path: &Path) {
    let mut spans = Vec::new();
    match &state.notice {
        Some(Notice::Info(msg)) => {
            spans.push(Span::styled(format!("{msg}  "), CardioTheme::info()));
        }
        Some(Notice::Error(msg)) => {
            spans.push(Span::styled(format!("! {msg}  "), CardioTheme::danger()));
        }
        None => {}
    }

    if state.report.is_some() {
        spans.push(Span::styled("[D] ", CardioTheme::key_hint()));
        spans.push(Span::styled(
            format!("Download Report ({}) ", report_path.display()),
            CardioTheme::key_desc(),
        ));
    }
    for (key, desc) in [
        ("[Enter] ", "Edit Inputs "),
        ("[N] ", "New Patient "),
        ("[Ctrl+Q] ", "Quit"),
    ] {
        spans.push(Span::styled(key, CardioTheme::key_hint()));
        spans.push(Span::styled(desc, CardioTheme::key_desc()));
    }

    let footer = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(CardioTheme::border()),
    );
    f.render_widget(footer, area);
}
