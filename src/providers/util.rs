use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::core::error::RateError;
use crate::core::rate::DateKey;

/// Runs a single-date operation with an upper bound on its duration
///
/// # Parameters
/// - `date`: Date being fetched, used in the timeout error
/// - `timeout`: Maximum time to wait for `operation`
/// - `operation`: Future producing the result
///
/// # Returns
/// The operation's own result, or `RateError::Timeout` when it did not finish in time
pub async fn with_timeout<Fut, T>(date: DateKey, timeout: Duration, operation: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Request for {} exceeded {:?}", date, timeout);
            Err(RateError::Timeout { date, timeout }.into())
        }
    }
}
