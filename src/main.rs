use clap::{CommandFactory, Parser};
use privat_rates::cli::ui::{StyleType, style_err_text};
use privat_rates::cli::OutputFormat;
use privat_rates::cli::rates::error_prefix;
use privat_rates::core::log::init_logging;
use privat_rates::core::rate::DayCount;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Number of days to fetch, counting back from today (1-10)
    #[arg(allow_negative_numbers = true)]
    days: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Override the exchange rate API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Do not show a progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let Some(days) = cli.days.as_deref() else {
        if let Err(e) = Cli::command().print_help() {
            tracing::error!(error = %e, "Failed to print usage");
        }
        return ExitCode::SUCCESS;
    };

    let result = match days.parse::<DayCount>() {
        Ok(days) => {
            let options = privat_rates::RunOptions {
                days,
                config_path: cli.config_path,
                base_url: cli.base_url,
                timeout_secs: cli.timeout,
                format: cli.format,
                show_progress: !cli.quiet,
            };
            privat_rates::run(&options).await
        }
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Application failed");
            eprintln!(
                "{} {e:#}",
                style_err_text(error_prefix(&e), StyleType::Error)
            );
            ExitCode::FAILURE
        }
    }
}
