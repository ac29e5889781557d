//! Exchange rate abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use super::error::RateError;

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 10;

/// Number of days to look back, always within `MIN_DAYS..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount(u8);

impl DayCount {
    pub fn new(days: i64) -> Result<Self, RateError> {
        if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
            return Err(RateError::InvalidArgument(format!(
                "The number of days must be between {MIN_DAYS} and {MAX_DAYS}."
            )));
        }
        Ok(DayCount(days as u8))
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

impl FromStr for DayCount {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s.trim().parse::<i64>().map_err(|_| {
            RateError::InvalidArgument(format!("Invalid number of days '{s}': expected an integer"))
        })?;
        DayCount::new(days)
    }
}

/// A calendar date rendered as `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub const FORMAT: &'static str = "%d.%m.%Y";

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns `today` followed by the `days - 1` preceding calendar days.
    pub fn last_days(today: NaiveDate, days: DayCount) -> Vec<DateKey> {
        (0..days.get() as u64)
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(DateKey)
            .collect()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, Self::FORMAT)
            .map(DateKey)
            .map_err(|e| anyhow::anyhow!("Invalid date key '{}': {}", s, e))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Currency {
    Eur,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Eur, Currency::Usd];
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Currency::Eur => "EUR",
                Currency::Usd => "USD",
            }
        )
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

/// Bank sale and purchase rate for one currency on one date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyQuote {
    pub sale: Option<f64>,
    pub purchase: Option<f64>,
}

/// Quotes for the tracked currencies. `None` means the date did not list that
/// currency at all.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyRates {
    #[serde(rename = "EUR")]
    pub eur: Option<CurrencyQuote>,
    #[serde(rename = "USD")]
    pub usd: Option<CurrencyQuote>,
}

impl CurrencyRates {
    pub fn get(&self, currency: Currency) -> Option<&CurrencyQuote> {
        match currency {
            Currency::Eur => self.eur.as_ref(),
            Currency::Usd => self.usd.as_ref(),
        }
    }

    pub fn set(&mut self, currency: Currency, quote: CurrencyQuote) {
        match currency {
            Currency::Eur => self.eur = Some(quote),
            Currency::Usd => self.usd = Some(quote),
        }
    }
}

/// Rates for a single date. Serialized as a one-entry object keyed by the date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<DateKey, CurrencyRates>",
    try_from = "BTreeMap<DateKey, CurrencyRates>"
)]
pub struct DateRecord {
    pub date: DateKey,
    pub rates: CurrencyRates,
}

impl From<DateRecord> for BTreeMap<DateKey, CurrencyRates> {
    fn from(record: DateRecord) -> Self {
        BTreeMap::from([(record.date, record.rates)])
    }
}

impl TryFrom<BTreeMap<DateKey, CurrencyRates>> for DateRecord {
    type Error = String;

    fn try_from(map: BTreeMap<DateKey, CurrencyRates>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "expected exactly one date per record, found {}",
                map.len()
            ));
        }
        let (date, rates) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty date record".to_string())?;
        Ok(DateRecord { date, rates })
    }
}

/// Successfully fetched records, most recent date first.
pub type ResultSet = Vec<DateRecord>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, date: DateKey) -> Result<DateRecord>;
}
