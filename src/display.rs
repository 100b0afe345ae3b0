//! Classic-mode output: prints assessment results as tables on stdout.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::api_client::{ApplicantRequest, HealthResponse, ModelInfo, PredictionResult, Rating};

pub fn display_result(request: &ApplicantRequest, result: &PredictionResult) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        "Default Probability".to_string(),
        format!("{:.2}%", result.default_probability * 100.0),
    ]);
    table.add_row(vec![
        "Credit Score (300-900)".to_string(),
        result.credit_score.to_string(),
    ]);
    table.add_row(vec![
        "Rating".to_string(),
        result.rating.as_str().to_string(),
    ]);
    table.add_row(vec![
        "Loan-to-Income Ratio".to_string(),
        format!("{:.2}", result.loan_to_income_ratio),
    ]);

    println!("{table}");

    let summary = format!(
        "Assessment complete: {} / {} ({})",
        result.credit_score,
        900,
        result.rating.as_str()
    );
    match result.rating {
        Rating::Poor => println!("{}", summary.red()),
        Rating::Average => println!("{}", summary.yellow()),
        Rating::Good | Rating::Excellent => println!("{}", summary.green()),
    }
    println!(
        "{}",
        format!(
            "Applicant: age {}, income {:.0}, loan {:.0} over {} months",
            request.age, request.income, request.loan_amount, request.loan_tenure_months
        )
        .dark_grey()
    );
}

pub fn display_health(health: &HealthResponse) {
    println!(
        "{} {} ({}, {})",
        "Service:".bold(),
        health.status.clone().green(),
        health.service,
        health.timestamp
    );
}

pub fn display_model_info(info: &ModelInfo) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Property").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec!["Model".to_string(), info.model_type.clone()]);
    table.add_row(vec!["Features".to_string(), info.features.to_string()]);
    table.add_row(vec!["Version".to_string(), info.version.clone()]);
    table.add_row(vec![
        "Training".to_string(),
        info.training_method.clone(),
    ]);
    table.add_row(vec!["Score Range".to_string(), info.score_range.clone()]);
    println!("{table}");
}
