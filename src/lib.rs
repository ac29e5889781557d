pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use crate::core::rate::DayCount;
use crate::providers::PrivatBankProvider;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// Settings for a single run, usually built from command line arguments.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub days: DayCount,
    pub config_path: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub format: OutputFormat,
    pub show_progress: bool,
}

impl RunOptions {
    pub fn new(days: DayCount) -> Self {
        RunOptions {
            days,
            config_path: None,
            base_url: None,
            timeout_secs: None,
            format: OutputFormat::default(),
            show_progress: false,
        }
    }

    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match self.config_path.as_deref() {
            Some(path) => AppConfig::load_from_path(path)?,
            None => AppConfig::load()?,
        };
        if let Some(base_url) = &self.base_url {
            config.providers.privatbank.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Fetches rates for the last `options.days` days ending today (local time)
/// and returns the rendered output.
pub async fn run(options: &RunOptions) -> Result<String> {
    run_at(options, Local::now().date_naive()).await
}

pub async fn run_at(options: &RunOptions, today: NaiveDate) -> Result<String> {
    info!("Fetching exchange rates for {} days", options.days.get());

    let config = options.load_config()?;
    debug!("Loaded config: {config:#?}");

    let provider = PrivatBankProvider::from_config(&config)?;

    cli::rates::run(
        options.days,
        &provider,
        today,
        options.format,
        options.show_progress,
    )
    .await
}
