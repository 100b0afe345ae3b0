use anyhow::{Context, Result};
use crossterm::style::Stylize;

use risk_cli::api_client::{ApplicantRequest, PredictionClient};
use risk_cli::config::config::Config;
use risk_cli::display;

fn print_help() {
    println!("{}", "risk-cli - Credit risk assessment client".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  risk-cli [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {}        - Score an application from a JSON file and exit",
        "--file <path>".green()
    );
    println!(
        "  {}       - One-shot CLI mode (requires --file)",
        "--classic".green()
    );
    println!(
        "  {}        - Check the prediction service and exit",
        "--health".green()
    );
    println!(
        "  {}    - Show prediction model details and exit",
        "--model-info".green()
    );
    println!(
        "  {} - Write a commented default config file",
        "--generate-config".green()
    );
    println!("  {}          - Show this help", "--help".green());
    println!();
    println!("{}", "Interactive mode (default):".yellow());
    println!("  Tab/↓ and Shift+Tab/↑ move between fields, ←/→ change a");
    println!("  selector, Enter submits, F1 shows help.");
    println!();
    println!("{}", "Environment:".yellow());
    println!("  RISK_API_URL - prediction service base URL");
    println!("                 (overrides the config file; default http://localhost:8000)");
    println!();
    println!("{}", "Application file format (--file):".yellow());
    println!("  JSON object with the request fields, e.g.:");
    println!("  {{\"age\": 28, \"income\": 1200000, \"loan_amount\": 2560000,");
    println!("   \"loan_tenure_months\": 36, \"avg_dpd_per_delinquency\": 20,");
    println!("   \"delinquency_ratio\": 30, \"credit_utilization_ratio\": 30,");
    println!("   \"num_open_accounts\": 2, \"residence_type\": \"Owned\",");
    println!("   \"loan_purpose\": \"Home\", \"loan_type\": \"Secured\"}}");
}

/// Non-interactive path: one application in, one result table out.
fn run_classic(client: &PredictionClient, file_path: &str) -> Result<()> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("cannot read application file: {}", file_path))?;
    let request: ApplicantRequest = serde_json::from_str(&contents)
        .with_context(|| format!("invalid application in {}", file_path))?;

    println!(
        "{}",
        format!("Scoring application against {}", client.base_url()).cyan()
    );

    match client.predict(&request) {
        Ok(result) => {
            display::display_result(&request, &result);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    risk_cli::utils::logging::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_help();
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at: {:?}", path);
        println!("Edit this file to customize risk-cli.");
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: could not load config ({}), using defaults", e);
        Config::default()
    });

    let api_url =
        std::env::var("RISK_API_URL").unwrap_or_else(|_| config.api.base_url.clone());
    let client = PredictionClient::new(&api_url);

    if args.contains(&"--health".to_string()) {
        match client.health() {
            Ok(health) => {
                display::display_health(&health);
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", format!("Service check failed: {}", e).red());
                std::process::exit(1);
            }
        }
    }

    if args.contains(&"--model-info".to_string()) {
        match client.model_info() {
            Ok(info) => {
                display::display_model_info(&info);
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", format!("Could not fetch model info: {}", e).red());
                std::process::exit(1);
            }
        }
    }

    let file_arg = args
        .iter()
        .position(|arg| arg == "--file")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
        .or_else(|| {
            // Bare JSON path also accepted, like `risk-cli app.json`
            args.iter()
                .skip(1)
                .find(|arg| !arg.starts_with("--") && arg.ends_with(".json"))
                .cloned()
        });

    let use_classic = args.contains(&"--classic".to_string()) || file_arg.is_some();

    if use_classic {
        let Some(file_path) = file_arg else {
            eprintln!(
                "{}",
                "Classic mode needs an application file: risk-cli --file <path.json>".red()
            );
            std::process::exit(1);
        };
        return run_classic(&client, &file_path);
    }

    risk_cli::ui::tui_app::run_tui_app(&api_url, config)
}
