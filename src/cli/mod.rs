//! Output rendering and run orchestration for the command line

pub mod rates;
pub mod ui;

pub use rates::OutputFormat;
