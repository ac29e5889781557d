//! Error types surfaced by the rate fetching pipeline.
//!
//! Most functions return `anyhow::Result`; these variants exist where a caller
//! needs to tell failures apart (e.g. the binary choosing an exit message).
use std::time::Duration;

use thiserror::Error;

use super::rate::DateKey;

#[derive(Error, Debug)]
pub enum RateError {
    /// The day count was missing, non-numeric or out of range.
    #[error("{0}")]
    InvalidArgument(String),

    /// The upstream answered with something other than 200 OK.
    #[error("Failed to fetch data for {date}, status: {status}")]
    Status {
        date: DateKey,
        status: reqwest::StatusCode,
    },

    /// A single-date request did not finish in time.
    #[error("Request for {date} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { date: DateKey, timeout: Duration },
}

impl RateError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RateError::InvalidArgument(_))
    }
}
