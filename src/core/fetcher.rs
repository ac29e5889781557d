//! Concurrent fan-out of single-date fetches.

use chrono::NaiveDate;
use futures::future::join_all;
use indicatif::ProgressBar;
use tracing::{debug, warn};

use super::rate::{DateKey, DateRecord, DayCount, RateProvider, ResultSet};

pub struct RateFetcher<'a> {
    days: DayCount,
    provider: &'a (dyn RateProvider + Send + Sync),
}

impl<'a> RateFetcher<'a> {
    pub fn new(days: DayCount, provider: &'a (dyn RateProvider + Send + Sync)) -> Self {
        RateFetcher { days, provider }
    }

    pub fn days(&self) -> DayCount {
        self.days
    }

    /// Fetches every date ending at `today`. The returned vector has one slot
    /// per date, most recent first; failed dates are `None`.
    pub async fn fetch_all(&self, today: NaiveDate) -> Vec<Option<DateRecord>> {
        self.fetch_all_with_progress(today, &ProgressBar::hidden())
            .await
    }

    pub async fn fetch_all_with_progress(
        &self,
        today: NaiveDate,
        pb: &ProgressBar,
    ) -> Vec<Option<DateRecord>> {
        let dates = DateKey::last_days(today, self.days);
        debug!("Fetching rates for {} dates", dates.len());

        let futures = dates.into_iter().map(|date| {
            let pb_clone = pb.clone();
            async move {
                let res = self.fetch_one(date).await;
                pb_clone.inc(1);
                res
            }
        });

        join_all(futures).await
    }

    async fn fetch_one(&self, date: DateKey) -> Option<DateRecord> {
        match self.provider.fetch_rates(date).await {
            Ok(record) => Some(record),
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(date = %date, error = %reason, "Error fetching data");
                None
            }
        }
    }

    /// Drops failed dates, keeping the order of the rest.
    pub fn collect(results: Vec<Option<DateRecord>>) -> ResultSet {
        let requested = results.len();
        let records: ResultSet = results.into_iter().flatten().collect();
        let failed = requested - records.len();
        if failed > 0 {
            warn!(failed, requested, "Some dates were dropped from the output");
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate::{Currency, CurrencyQuote, CurrencyRates};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::Datelike;
    use std::collections::HashSet;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct MockProvider {
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new(failing: &[&str]) -> Self {
            MockProvider {
                failing: failing.iter().map(|d| d.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        async fn fetch_rates(&self, date: DateKey) -> Result<DateRecord> {
            let key = date.to_string();
            self.calls.lock().unwrap().push(key.clone());

            // Older dates answer first so completion order differs from request order
            let day = u64::from(date.date().day());
            tokio::time::sleep(Duration::from_millis(day * 5)).await;

            if self.failing.contains(&key) {
                return Err(anyhow!("HTTP error for {}", key));
            }
            let mut rates = CurrencyRates::default();
            rates.set(
                Currency::Usd,
                CurrencyQuote {
                    sale: Some(day as f64),
                    purchase: None,
                },
            );
            Ok(DateRecord { date, rates })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn keys(records: &ResultSet) -> Vec<String> {
        records.iter().map(|r| r.date.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_all_issues_one_request_per_day() {
        for n in 1..=10 {
            let provider = MockProvider::new(&[]);
            let fetcher = RateFetcher::new(DayCount::new(n).unwrap(), &provider);

            let results = fetcher.fetch_all(today()).await;

            assert_eq!(results.len(), n as usize);
            assert!(results.iter().all(Option::is_some));
            assert_eq!(provider.calls.lock().unwrap().len(), n as usize);
        }
    }

    #[tokio::test]
    async fn test_results_follow_request_order() {
        let provider = MockProvider::new(&[]);
        let fetcher = RateFetcher::new(DayCount::new(3).unwrap(), &provider);

        let records = RateFetcher::collect(fetcher.fetch_all(today()).await);

        assert_eq!(keys(&records), vec!["10.06.2024", "09.06.2024", "08.06.2024"]);
    }

    #[tokio::test]
    async fn test_failed_date_is_dropped() {
        let provider = MockProvider::new(&["09.06.2024"]);
        let fetcher = RateFetcher::new(DayCount::new(4).unwrap(), &provider);

        let results = fetcher.fetch_all(today()).await;
        assert_eq!(results.len(), 4);
        assert!(results[1].is_none());

        let records = RateFetcher::collect(results);
        assert_eq!(
            keys(&records),
            vec!["10.06.2024", "08.06.2024", "07.06.2024"]
        );
    }

    #[tokio::test]
    async fn test_all_dates_failing_yields_empty_set() {
        let provider = MockProvider::new(&["10.06.2024", "09.06.2024"]);
        let fetcher = RateFetcher::new(DayCount::new(2).unwrap(), &provider);

        let records = RateFetcher::collect(fetcher.fetch_all(today()).await);
        assert!(records.is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failures_are_logged_at_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = MockProvider::new(&["09.06.2024"]);
        let fetcher = RateFetcher::new(DayCount::new(2).unwrap(), &provider);
        let records = RateFetcher::collect(fetcher.fetch_all(today()).await);
        assert_eq!(records.len(), 1);

        let output = logs.contents();
        assert!(output.contains("Error fetching data"), "{output}");
        assert!(output.contains("error=HTTP error for 09.06.2024"), "{output}");
        assert_eq!(output.matches("09.06.2024").count(), 2, "{output}");
        assert!(
            output.contains("Some dates were dropped from the output failed=1 requested=2"),
            "{output}"
        );
    }

    #[tokio::test]
    async fn test_progress_counts_every_date() {
        let provider = MockProvider::new(&["08.06.2024"]);
        let fetcher = RateFetcher::new(DayCount::new(5).unwrap(), &provider);
        let pb = ProgressBar::hidden();
        pb.set_length(5);

        fetcher.fetch_all_with_progress(today(), &pb).await;
        assert_eq!(pb.position(), 5);
    }
}
