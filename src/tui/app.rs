//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (form and result)
//! - Input event handling
//! - Synchronous prediction and report export

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::artifacts::ArtifactLoader;
use crate::adapters::forest::RandomForestClassifier;
use crate::adapters::pdf::PdfReportRenderer;
use crate::adapters::scaler::FittedScaler;
use crate::application::{PredictionService, ReportService};
use crate::ports::{Classifier, Scaler};
use crate::{AppConfig, CardioError};

use super::ui::{
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, Notice, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for a submission; rejected submissions stay here.
    Form,
    /// Presenting an assessment.
    Result,
}

/// Main application state
pub struct App<C = RandomForestClassifier, S = FittedScaler>
where
    C: Classifier,
    S: Scaler,
{
    screen: Screen,
    should_quit: bool,
    predictions: PredictionService<C, S>,
    reports: ReportService<PdfReportRenderer>,
    form: PatientFormState,
    result: Option<ResultState>,
}

impl App {
    /// Load artifacts and build the application.
    ///
    /// # Errors
    /// Returns error if any artifact is missing, fails integrity checks or
    /// disagrees with the feature schema. No terminal setup happens before
    /// this succeeds.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loaded = ArtifactLoader::new(&config.artifact_dir, config.trust.clone()).load()?;

        let predictions = PredictionService::new(
            Arc::new(loaded.classifier),
            Arc::new(loaded.scaler),
            loaded.schema,
        )?;
        let reports = ReportService::new(PdfReportRenderer::new(), &config.export_dir);

        Ok(Self::with_dependencies(predictions, reports))
    }
}

impl<C, S> App<C, S>
where
    C: Classifier,
    S: Scaler,
{
    /// Create application with injected services.
    pub fn with_dependencies(
        predictions: PredictionService<C, S>,
        reports: ReportService<PdfReportRenderer>,
    ) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            predictions,
            reports,
            form: PatientFormState::default(),
            result: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match (self.screen, &self.result) {
                    (Screen::Result, Some(result)) => {
                        render_result(f, chunks[0], result, &self.reports.target_path());
                    }
                    _ => render_patient_form(f, chunks[0], &self.form),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.cycle_choice(false),
            KeyCode::Right => self.form.cycle_choice(true),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample_data(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.form.reset(),
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.form.toggle_help();
            }
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('d') | KeyCode::Char('D') => self.save_report(),
            KeyCode::Enter | KeyCode::Esc => self.leave_result(),
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.leave_result();
                self.form.reset();
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let draft = self.form.to_draft();
        match self.predictions.submit(&draft) {
            Ok(assessment) => {
                let report = match self.reports.build(&assessment) {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        tracing::warn!("Report generation failed: {}", e);
                        None
                    }
                };
                self.form.error_message = None;
                self.result = Some(ResultState::new(assessment, report));
                self.screen = Screen::Result;
            }
            Err(e @ CardioError::IncompleteInput(_)) => {
                self.form.error_message = Some(e.to_string());
            }
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                self.form.error_message = Some(e.to_string());
            }
        }
    }

    fn save_report(&mut self) {
        let Some(result) = self.result.as_mut() else {
            return;
        };
        let Some(bytes) = result.report.as_deref() else {
            result.notice = Some(Notice::Error("Report unavailable".to_string()));
            return;
        };

        result.notice = Some(match self.reports.save(bytes) {
            Ok(path) => Notice::Info(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!("{}", e);
                Notice::Error(e.to_string())
            }
        });
    }

    /// Discard the presented assessment and go back to the form.
    fn leave_result(&mut self) {
        self.result = None;
        self.screen = Screen::Form;
    }
}
