use super::ui;
use crate::core::error::RateError;
use crate::core::fetcher::RateFetcher;
use crate::core::rate::{Currency, DayCount, RateProvider, ResultSet};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Human readable table
    Table,
}

pub async fn run(
    days: DayCount,
    provider: &(dyn RateProvider + Send + Sync),
    today: NaiveDate,
    format: OutputFormat,
    show_progress: bool,
) -> Result<String> {
    let fetcher = RateFetcher::new(days, provider);

    let pb = if show_progress {
        ui::new_progress_bar(fetcher.days().get() as u64)
    } else {
        indicatif::ProgressBar::hidden()
    };
    pb.set_message("Fetching rates...");
    let results = fetcher.fetch_all_with_progress(today, &pb).await;
    pb.finish_and_clear();

    let records = RateFetcher::collect(results);
    render(&records, format)
}

/// Prefix shown before a failure message: argument errors are reported as
/// such, everything else as unexpected.
pub fn error_prefix(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<RateError>() {
        Some(rate_err) if rate_err.is_invalid_argument() => "Error:",
        _ => "An unexpected error occurred:",
    }
}

pub fn render(records: &ResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(records),
        OutputFormat::Table => Ok(render_table(records)),
    }
}

pub fn render_json(records: &ResultSet) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize exchange rates")
}

pub fn render_table(records: &ResultSet) -> String {
    if records.is_empty() {
        return ui::style_text("No exchange rates available.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Currency"),
        ui::header_cell("Sale (UAH)"),
        ui::header_cell("Purchase (UAH)"),
    ]);

    for record in records {
        for currency in Currency::ALL {
            let quote = record.rates.get(currency);
            table.add_row(vec![
                Cell::new(record.date.to_string()),
                Cell::new(currency.to_string()),
                ui::format_optional_cell(quote.and_then(|q| q.sale), |v| format!("{v:.4}")),
                ui::format_optional_cell(quote.and_then(|q| q.purchase), |v| format!("{v:.4}")),
            ]);
        }
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        table
    )
}
