// Logging goes to stderr; stdout carries only the rendered rates
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::WARN, "warn")
    };
    let app_filter = Targets::new().with_target("privat_rates", level_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time();
    if verbose {
        tracing_subscriber::registry()
            .with(layer.pretty())
            .with(app_filter)
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(layer.compact().with_target(false))
            .with(app_filter)
            .with(env_filter)
            .init();
    }
}
