use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::api_client::{LoanPurpose, LoanType, PredictionClient, ResidenceType};
use crate::app_state::SubmissionTracker;
use crate::config::config::Config;
use crate::form::{FormState, NumericField};
use crate::history::AssessmentHistory;
use crate::ui::result_cards::ResultCards;
use crate::utils::logging;

/// Numeric inputs first, then the three selectors, in screen order.
const NUMERIC_COUNT: usize = NumericField::ALL.len();
const FOCUS_COUNT: usize = NUMERIC_COUNT + 3;
const LABEL_WIDTH: usize = 24;

#[derive(Clone, Copy, PartialEq)]
enum Overlay {
    None,
    Help,
    History,
    Log,
}

pub struct TuiApp {
    client: PredictionClient,
    form: FormState,
    tracker: SubmissionTracker,
    history: Option<AssessmentHistory>,
    result_cards: ResultCards,
    inputs: Vec<Input>,
    focus: usize,
    overlay: Overlay,
    status_message: String,
    config: Config,
}

impl TuiApp {
    pub fn new(api_url: &str, config: Config) -> Self {
        let client = PredictionClient::new(api_url);

        let history = if config.behavior.enable_history {
            match AssessmentHistory::new(config.behavior.max_history_entries) {
                Ok(history) => Some(history),
                Err(e) => {
                    tracing::warn!(target: "history", "history disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let status_message = if config.behavior.health_check_on_start {
            match client.health() {
                Ok(health) => format!(
                    "{} Connected to {} ({})",
                    config.display.icons.api,
                    client.base_url(),
                    health.status
                ),
                Err(_) => format!(
                    "{} Service unreachable at {} - submissions will fail until it is up",
                    config.display.icons.warning,
                    client.base_url()
                ),
            }
        } else {
            "Ready - fill in the application and press Enter".to_string()
        };

        Self {
            client,
            form: FormState::new(),
            tracker: SubmissionTracker::new(),
            history,
            result_cards: ResultCards::new(),
            inputs: (0..NUMERIC_COUNT).map(|_| Input::default()).collect(),
            focus: 0,
            overlay: Overlay::None,
            status_message,
            config,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => {
                        if self.overlay != Overlay::None {
                            self.overlay = Overlay::None;
                        } else {
                            break;
                        }
                    }
                    KeyCode::F(1) => self.toggle_overlay(Overlay::Help),
                    KeyCode::F(3) => self.toggle_overlay(Overlay::History),
                    KeyCode::F(5) => self.toggle_overlay(Overlay::Log),
                    _ if self.overlay != Overlay::None => {
                        // Overlays swallow everything else
                    }
                    KeyCode::Enter => self.submit(),
                    KeyCode::Tab | KeyCode::Down => {
                        self.focus = (self.focus + 1) % FOCUS_COUNT;
                    }
                    KeyCode::BackTab | KeyCode::Up => {
                        self.focus = (self.focus + FOCUS_COUNT - 1) % FOCUS_COUNT;
                    }
                    KeyCode::Left if self.focused_numeric().is_none() => self.cycle_enum(-1),
                    KeyCode::Right if self.focused_numeric().is_none() => self.cycle_enum(1),
                    KeyCode::Char(' ') if self.focused_numeric().is_none() => self.cycle_enum(1),
                    _ => {
                        if let Some(field) = self.focused_numeric() {
                            self.inputs[self.focus].handle_event(&Event::Key(key));
                            let value = self.inputs[self.focus].value().to_string();
                            self.form.set_field(field, value);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn focused_numeric(&self) -> Option<NumericField> {
        NumericField::ALL.get(self.focus).copied()
    }

    fn toggle_overlay(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
    }

    fn cycle_enum(&mut self, step: isize) {
        fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
            let index = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
            let next = (index + step).rem_euclid(all.len() as isize) as usize;
            all[next]
        }

        match self.focus - NUMERIC_COUNT {
            0 => {
                self.form.residence_type =
                    cycle(&ResidenceType::ALL, self.form.residence_type, step)
            }
            1 => self.form.loan_purpose = cycle(&LoanPurpose::ALL, self.form.loan_purpose, step),
            _ => self.form.loan_type = cycle(&LoanType::ALL, self.form.loan_type, step),
        }
    }

    /// Build the request from current form state and run one round trip.
    /// The call blocks at the network boundary; no guard prevents another
    /// submission afterwards, and the last completion is what stays on
    /// screen.
    fn submit(&mut self) {
        let request = self.form.build_request();
        self.tracker.begin();
        self.status_message = "Submitting application...".to_string();

        match self.client.predict(&request) {
            Ok(result) => {
                self.status_message = format!(
                    "{} Assessment #{} complete - score {} ({})",
                    self.config.display.icons.success,
                    self.tracker.attempts(),
                    result.credit_score,
                    result.rating.as_str()
                );
                if let Some(history) = self.history.as_mut() {
                    if let Err(e) = history.record_success(&request, &result) {
                        tracing::warn!(target: "history", "could not record entry: {}", e);
                    }
                }
                self.tracker.complete(result);
            }
            Err(e) => {
                self.status_message = format!(
                    "{} Assessment failed - press Enter to retry",
                    self.config.display.icons.error
                );
                if let Some(history) = self.history.as_mut() {
                    if let Err(err) = history.record_failure(&request, &e.to_string()) {
                        tracing::warn!(target: "history", "could not record entry: {}", err);
                    }
                }
                self.tracker.fail(e.to_string());
            }
        }
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Form + result panel
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        self.render_form(f, panels[0]);
        self.result_cards.render(f, panels[1], self.tracker.state());
        self.render_status_bar(f, chunks[1]);

        match self.overlay {
            Overlay::None => {}
            Overlay::Help => self.render_help_popup(f),
            Overlay::History => self.render_history_popup(f),
            Overlay::Log => self.render_log_popup(f),
        }
    }

    fn render_form(&self, f: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        for (i, field) in NumericField::ALL.iter().enumerate() {
            lines.push(self.numeric_line(i, *field));
        }

        let selectors: [(&str, String); 3] = [
            (
                "Residence Type",
                self.form.residence_type.as_str().to_string(),
            ),
            ("Loan Purpose", self.form.loan_purpose.as_str().to_string()),
            ("Loan Type", self.form.loan_type.as_str().to_string()),
        ];
        for (offset, (label, value)) in selectors.into_iter().enumerate() {
            lines.push(self.selector_line(NUMERIC_COUNT + offset, label, value));
        }

        lines.push(Line::from(""));
        let preview = self.form.loan_to_income_preview();
        let preview_span = match &preview {
            Some(ratio) => Span::styled(ratio.clone(), Style::default().fg(Color::Cyan)),
            None => Span::styled(
                "auto-calculated",
                Style::default().fg(Color::DarkGray),
            ),
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<width$}", "Loan to Income Ratio", width = LABEL_WIDTH)),
            preview_span,
        ]));
        lines.push(Line::from(""));
        lines.push(
            Line::from("  Enter submits the application")
                .style(Style::default().fg(Color::DarkGray)),
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Loan Application");
        f.render_widget(Paragraph::new(lines).block(block), area);

        // Terminal cursor sits inside the focused numeric input
        if self.focused_numeric().is_some() {
            let input = &self.inputs[self.focus];
            f.set_cursor_position((
                area.x + 1 + 2 + LABEL_WIDTH as u16 + input.visual_cursor() as u16,
                area.y + 1 + self.focus as u16,
            ));
        }
    }

    fn numeric_line(&self, index: usize, field: NumericField) -> Line<'_> {
        let focused = self.focus == index;
        let marker = if focused { "▸ " } else { "  " };
        let raw = self.form.raw(field);

        let value_span = if raw.is_empty() {
            let mut hint = field.placeholder().to_string();
            if let Some(bounds) = field.bounds_hint() {
                hint.push_str(&format!("  [{}]", bounds));
            }
            Span::styled(hint, Style::default().fg(Color::DarkGray))
        } else {
            let style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Span::styled(raw.to_string(), style)
        };

        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(marker),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                label_style,
            ),
            value_span,
        ])
    }

    fn selector_line(&self, index: usize, label: &str, value: String) -> Line<'_> {
        let focused = self.focus == index;
        let marker = if focused { "▸ " } else { "  " };
        let rendered = if focused {
            format!("◂ {} ▸", value)
        } else {
            value
        };
        let value_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
            Span::styled(rendered, value_style),
        ])
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let mode = if self.tracker.is_submitting() {
            "BUSY"
        } else {
            "FORM"
        };
        let status_line = Line::from(vec![
            Span::styled(&self.status_message, Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(
                mode,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | F1=Help | F3=History | F5=Log | Esc=Quit"),
        ]);

        let status = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }

    fn render_help_popup(&self, f: &mut Frame) {
        let area = centered_rect(70, 60, f.area());
        f.render_widget(Clear, area);

        let help_text = vec![
            Line::from(vec![Span::styled(
                "Credit Risk CLI Help",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("Form:"),
            Line::from("  Tab / ↓     - Next field"),
            Line::from("  Shift+Tab / ↑ - Previous field"),
            Line::from("  ← → / Space - Change a selector value"),
            Line::from("  Enter       - Submit the application"),
            Line::from(""),
            Line::from("Overlays:"),
            Line::from("  F1          - This help"),
            Line::from("  F3          - Assessment history"),
            Line::from("  F5          - Activity log"),
            Line::from("  Esc         - Close overlay / exit"),
            Line::from(""),
            Line::from("Numeric ranges next to each field are hints;"),
            Line::from("out-of-range values are submitted as typed and"),
            Line::from("rejected by the service, not by this form."),
        ];

        let help_popup = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: true });

        f.render_widget(help_popup, area);
    }

    fn render_history_popup(&self, f: &mut Frame) {
        let area = centered_rect(85, 60, f.area());
        f.render_widget(Clear, area);

        let lines: Vec<Line> = match &self.history {
            Some(history) if !history.is_empty() => history
                .entries()
                .iter()
                .rev()
                .take(15)
                .map(|entry| {
                    let style = if entry.success {
                        Style::default()
                    } else {
                        Style::default().fg(Color::Red)
                    };
                    Line::from(entry.format_for_display()).style(style)
                })
                .collect(),
            Some(_) => vec![Line::from("No assessments recorded yet")],
            None => vec![Line::from("History is disabled in the config file")],
        };

        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Assessment History (newest first)"),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(popup, area);
    }

    fn render_log_popup(&self, f: &mut Frame) {
        let area = centered_rect(85, 60, f.area());
        f.render_widget(Clear, area);

        let lines: Vec<Line> = match logging::get_log_buffer() {
            Some(buffer) if !buffer.is_empty() => buffer
                .get_recent(25)
                .iter()
                .map(|entry| Line::from(entry.format_for_display()))
                .collect(),
            _ => vec![Line::from("No log entries yet")],
        };

        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Activity Log"))
            .wrap(Wrap { trim: false });

        f.render_widget(popup, area);
    }
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn run_tui_app(api_url: &str, config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(api_url, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}
