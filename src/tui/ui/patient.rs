//! Patient information form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{ChestPainType, PatientDraft, RestingEcg, StSlope};
use crate::tui::styles::{CardioTheme, APP_NAME};

/// Placeholder for a choice field with nothing picked.
pub const UNSET_CHOICE: &str = "Select";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free numeric entry; `decimal` allows one fractional point.
    Numeric { decimal: bool },
    /// One of a fixed set of codes, or unset.
    Choice { options: &'static [(u8, &'static str)] },
}

static CHEST_PAIN_OPTIONS: [(u8, &str); 4] = [
    (1, "Typical angina"),
    (2, "Atypical angina"),
    (3, "Non-anginal"),
    (4, "Asymptomatic"),
];
static RESTING_ECG_OPTIONS: [(u8, &str); 3] =
    [(0, "Normal"), (1, "ST-T abnormality"), (2, "LV hypertrophy")];
static ST_SLOPE_OPTIONS: [(u8, &str); 3] = [(1, "Upsloping"), (2, "Flat"), (3, "Downsloping")];

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    /// Typed text for numeric fields.
    pub value: String,
    /// Picked code for choice fields.
    pub choice: Option<u8>,
}

impl FormField {
    fn numeric(label: &'static str, hint: &'static str, decimal: bool) -> Self {
        Self {
            label,
            hint,
            kind: FieldKind::Numeric { decimal },
            value: String::new(),
            choice: None,
        }
    }

    fn choice(label: &'static str, options: &'static [(u8, &'static str)]) -> Self {
        Self {
            label,
            hint: UNSET_CHOICE,
            kind: FieldKind::Choice { options },
            value: String::new(),
            choice: None,
        }
    }

    fn numeric_value(&self) -> Option<f64> {
        if self.value.is_empty() {
            return None;
        }
        // Unparseable text (a lone ".") fails range validation downstream.
        Some(self.value.parse().unwrap_or(f64::NAN))
    }

    /// Text shown in the field box.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        match self.kind {
            FieldKind::Numeric { .. } => (!self.value.is_empty()).then(|| self.value.clone()),
            FieldKind::Choice { options } => self.choice.map(|code| {
                let name = options
                    .iter()
                    .find(|(c, _)| *c == code)
                    .map_or("", |(_, name)| *name);
                format!("{code}: {name}")
            }),
        }
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
    pub show_help: bool,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::numeric("Age (years)", "e.g., 45 (1-120)", false),
                FormField::numeric("Resting BP (mm Hg)", "e.g., 120 (50-200)", false),
                FormField::numeric("Cholesterol (mg/dl)", "e.g., 200 (100-600)", false),
                FormField::numeric("Max Heart Rate", "e.g., 150 (60-220)", false),
                FormField::numeric("ST Depression", "e.g., 1.0 (0.0-6.0)", true),
                FormField::numeric("Major Vessels (0-3)", "e.g., 1", false),
                FormField::choice("Chest Pain Type", &CHEST_PAIN_OPTIONS),
                FormField::choice("Resting ECG", &RESTING_ECG_OPTIONS),
                FormField::choice("ST Slope", &ST_SLOPE_OPTIONS),
            ],
            selected_field: 0,
            error_message: None,
            show_help: false,
        }
    }
}

impl PatientFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Type a character into the selected field.
    ///
    /// Numeric fields take digits (and one `.` where decimals are allowed).
    /// Choice fields take the code of one of their options.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        match field.kind {
            FieldKind::Numeric { decimal } => {
                let accepted = c.is_ascii_digit() || (decimal && c == '.' && !field.value.contains('.'));
                if accepted && field.value.len() < 6 {
                    field.value.push(c);
                    self.error_message = None;
                }
            }
            FieldKind::Choice { options } => {
                if let Some(code) = c.to_digit(10) {
                    if options.iter().any(|(o, _)| u32::from(*o) == code) {
                        field.choice = Some(code as u8);
                        self.error_message = None;
                    }
                }
            }
        }
    }

    /// Step through the options of a choice field, passing through the unset state.
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = &mut self.fields[self.selected_field];
        let FieldKind::Choice { options } = field.kind else {
            return;
        };
        let current = field
            .choice
            .and_then(|code| options.iter().position(|(c, _)| *c == code));

        // Positions 0..n are options, n is "Select".
        let n = options.len();
        let pos = current.unwrap_or(n);
        let next = if forward { (pos + 1) % (n + 1) } else { (pos + n) % (n + 1) };
        field.choice = options.get(next).map(|(c, _)| *c);
        self.error_message = None;
    }

    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.selected_field];
        match field.kind {
            FieldKind::Numeric { .. } => {
                field.value.pop();
            }
            FieldKind::Choice { .. } => field.choice = None,
        }
    }

    /// Clear the selected field.
    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.selected_field];
        field.value.zeroize();
        field.choice = None;
    }

    /// Reset every field to unset, wiping typed buffers, and move to the first field.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
            field.choice = None;
        }
        self.selected_field = 0;
        self.error_message = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Snapshot of the form as a draft record.
    #[must_use]
    pub fn to_draft(&self) -> PatientDraft {
        let f = &self.fields;
        PatientDraft {
            age: f[0].numeric_value(),
            resting_bp: f[1].numeric_value(),
            cholesterol: f[2].numeric_value(),
            max_heart_rate: f[3].numeric_value(),
            st_depression: f[4].numeric_value(),
            major_vessels: f[5].numeric_value(),
            chest_pain: f[6].choice,
            resting_ecg: f[7].choice,
            st_slope: f[8].choice,
        }
    }

    /// Fill the form with a typical example patient.
    pub fn load_sample_data(&mut self) {
        let sample = ["45", "120", "200", "150", "1.0", "1"];
        for (field, value) in self.fields.iter_mut().zip(sample) {
            field.value = value.to_string();
        }
        self.fields[6].choice = Some(2);
        self.fields[7].choice = Some(0);
        self.fields[8].choice = Some(1);
        self.error_message = None;
    }
}

/// Render the patient form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);

    if state.show_help {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_form_fields(f, body[0], state);
        render_help(f, body[1]);
    } else {
        render_form_fields(f, chunks[1], state);
    }

    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ♥ ", CardioTheme::brand()),
        Span::styled(APP_NAME, CardioTheme::title()),
        Span::styled(
            " │ Patient Information (all fields are required)",
            CardioTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(CardioTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (CardioTheme::border_focused(), CardioTheme::focused())
        } else {
            (CardioTheme::border(), CardioTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = match field.display() {
            Some(text) => Span::styled(text, CardioTheme::text()),
            None => Span::styled(field.hint, CardioTheme::text_muted()),
        };

        let mut spans = vec![Span::raw(" "), value];
        if is_selected {
            spans.push(Span::styled("▌", CardioTheme::cursor()));
            if matches!(field.kind, FieldKind::Choice { .. }) {
                spans.push(Span::styled("  ◀ ▶", CardioTheme::text_muted()));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = |t: &'static str| Line::from(Span::styled(t, CardioTheme::subtitle()));
    let item = |t: String| Line::from(Span::styled(t, CardioTheme::text_secondary()));

    let mut lines = vec![heading("Fields")];
    lines.push(item("ST Depression: exercise-induced, relative to rest".into()));
    lines.push(item("Major Vessels: colored by fluoroscopy".into()));
    for cp in ChestPainType::ALL {
        lines.push(item(format!("Chest pain {}: {}", cp.code(), cp.description())));
    }
    for ecg in RestingEcg::ALL {
        lines.push(item(format!("Resting ECG {}: {}", ecg.code(), ecg.description())));
    }
    for slope in StSlope::ALL {
        lines.push(item(format!("ST slope {}: {}", slope.code(), slope.description())));
    }

    lines.push(Line::from(""));
    lines.push(heading("About Heart Disease"));
    lines.push(item(
        "The leading cause of death globally. Risk factors include high blood pressure, \
         high cholesterol, smoking and family history."
            .into(),
    ));
    lines.push(Line::from(""));
    lines.push(heading("Prevention"));
    for tip in [
        "Eat a diet low in saturated fats",
        "Exercise at least 150 minutes a week",
        "Avoid smoking and limit alcohol",
        "Monitor blood pressure and cholesterol",
    ] {
        lines.push(item(format!("- {tip}")));
    }
    lines
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(help_lines())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Help ", CardioTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(CardioTheme::border()),
        );
    f.render_widget(help, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", CardioTheme::danger()),
            Span::styled(err.clone(), CardioTheme::danger()),
        ])
    } else {
        let mut spans = Vec::new();
        for (key, desc) in [
            ("[↑↓] ", "Navigate "),
            ("[←→] ", "Choose "),
            ("[Enter] ", "Predict "),
            ("[Del] ", "Clear Field "),
            ("[C] ", "Clear Form "),
            ("[S] ", "Sample "),
            ("[H] ", "Help "),
            ("[Esc] ", "Quit"),
        ] {
            spans.push(Span::styled(key, CardioTheme::key_hint()));
            spans.push(Span::styled(desc, CardioTheme::key_desc()));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(CardioTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input_filters_characters() {
        let mut form = PatientFormState::default();
        for c in "4x5.".chars() {
            form.input_char(c);
        }
        assert_eq!(form.fields[0].value, "45");

        form.selected_field = 4;
        for c in "1.2.3".chars() {
            form.input_char(c);
        }
        assert_eq!(form.fields[4].value, "1.23");
    }

    #[test]
    fn test_choice_cycles_through_unset() {
        let mut form = PatientFormState::default();
        form.selected_field = 7; // Resting ECG: 0, 1, 2
        form.cycle_choice(true);
        assert_eq!(form.fields[7].choice, Some(0));
        form.cycle_choice(true);
        form.cycle_choice(true);
        assert_eq!(form.fields[7].choice, Some(2));
        form.cycle_choice(true);
        assert_eq!(form.fields[7].choice, None);
        form.cycle_choice(false);
        assert_eq!(form.fields[7].choice, Some(2));
    }

    #[test]
    fn test_choice_accepts_only_known_codes() {
        let mut form = PatientFormState::default();
        form.selected_field = 6; // Chest pain: 1-4
        form.input_char('0');
        assert_eq!(form.fields[6].choice, None);
        form.input_char('4');
        assert_eq!(form.fields[6].choice, Some(4));
        assert_eq!(form.fields[6].display().as_deref(), Some("4: Asymptomatic"));
    }

    #[test]
    fn test_sample_data_is_complete() {
        let mut form = PatientFormState::default();
        form.load_sample_data();
        let draft = form.to_draft();
        assert!(crate::domain::PatientRecord::try_from(&draft).is_ok());
    }

    #[test]
    fn test_reset_unsets_everything() {
        let mut form = PatientFormState::default();
        form.load_sample_data();
        form.selected_field = 5;
        form.error_message = Some("x".into());

        form.reset();
        assert_eq!(form.to_draft(), PatientDraft::default());
        assert_eq!(form.selected_field, 0);
        assert!(form.error_message.is_none());
    }

    #[test]
    fn test_lone_point_is_not_silently_dropped() {
        let mut form = PatientFormState::default();
        form.selected_field = 4;
        form.input_char('.');
        let draft = form.to_draft();
        assert!(draft.st_depression.is_some_and(f64::is_nan));
    }
}
