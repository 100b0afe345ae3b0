use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api_client::{PredictionResult, Rating};
use crate::app_state::SubmissionState;

/// Renders the right-hand panel: idle hint, in-flight notice, the four
/// returned risk metrics, or the failure notice.
pub struct ResultCards;

impl ResultCards {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, f: &mut Frame, area: Rect, state: &SubmissionState) {
        let (title, lines) = match state {
            SubmissionState::Idle => ("Assessment", Self::idle_lines()),
            SubmissionState::Submitting => (
                "Assessment",
                vec![
                    Line::from(""),
                    Line::from("Analyzing application...")
                        .style(Style::default().fg(Color::Yellow)),
                ],
            ),
            SubmissionState::Completed(result) => {
                ("Assessment Result", Self::result_lines(result))
            }
            SubmissionState::Failed(message) => ("Assessment Failed", Self::failure_lines(message)),
        };

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }

    fn idle_lines() -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from("Fill in the application on the left and press Enter"),
            Line::from("to request a credit-risk assessment."),
            Line::from(""),
            Line::from("Empty numeric fields are submitted as 0").style(Style::default().fg(Color::DarkGray)),
            Line::from("(open accounts default to 1).").style(Style::default().fg(Color::DarkGray)),
        ]
    }

    fn result_lines(result: &PredictionResult) -> Vec<Line<'static>> {
        let rating_style = match result.rating {
            Rating::Poor => Style::default().fg(Color::Red),
            Rating::Average => Style::default().fg(Color::Yellow),
            Rating::Good => Style::default().fg(Color::Green),
            Rating::Excellent => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        };

        vec![
            Line::from(""),
            Line::from(format!(
                "Default Probability   {:.2}%",
                result.default_probability * 100.0
            ))
            .style(Style::default().fg(Color::Cyan)),
            Line::from(format!(
                "                      {}",
                Self::probability_meter(result.default_probability)
            ))
            .style(Style::default().fg(Color::DarkGray)),
            Line::from(""),
            Line::from(format!("Credit Score          {} / 900", result.credit_score))
                .style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::from(format!("Rating                {}", result.rating.as_str()))
                .style(rating_style),
            Line::from(""),
            Line::from(format!(
                "Loan-to-Income Ratio  {:.2}",
                result.loan_to_income_ratio
            )),
            Line::from("(as computed by the service)")
                .style(Style::default().fg(Color::DarkGray)),
        ]
    }

    fn failure_lines(message: &str) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from("Could not get an assessment.").style(Style::default().fg(Color::Red)),
            Line::from(""),
            Line::from(message.to_string()).style(Style::default().fg(Color::DarkGray)),
            Line::from(""),
            Line::from("Check that the prediction service is running,"),
            Line::from("then press Enter to resubmit."),
        ]
    }

    /// Ten-cell bar scaled from the 0.0-1.0 probability.
    fn probability_meter(probability: f64) -> String {
        let filled = (probability.clamp(0.0, 1.0) * 10.0).round() as usize;
        let mut meter = String::new();
        for i in 0..10 {
            meter.push(if i < filled { '█' } else { '░' });
        }
        meter
    }
}
