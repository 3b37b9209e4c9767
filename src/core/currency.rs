//! Currency codes and fetched rate snapshots

use crate::core::error::ConverterError;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// The closed set of currencies offered by both front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CurrencyCode {
    USD,
    GBP,
    EUR,
    BDT,
    INR,
    JPY,
    AUD,
    CAD,
    CNY,
    SGD,
    AED,
    SAR,
}

impl CurrencyCode {
    /// Selector order.
    pub const ALL: [CurrencyCode; 12] = [
        CurrencyCode::USD,
        CurrencyCode::GBP,
        CurrencyCode::EUR,
        CurrencyCode::BDT,
        CurrencyCode::INR,
        CurrencyCode::JPY,
        CurrencyCode::AUD,
        CurrencyCode::CAD,
        CurrencyCode::CNY,
        CurrencyCode::SGD,
        CurrencyCode::AED,
        CurrencyCode::SAR,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::BDT => "BDT",
            CurrencyCode::INR => "INR",
            CurrencyCode::JPY => "JPY",
            CurrencyCode::AUD => "AUD",
            CurrencyCode::CAD => "CAD",
            CurrencyCode::CNY => "CNY",
            CurrencyCode::SGD => "SGD",
            CurrencyCode::AED => "AED",
            CurrencyCode::SAR => "SAR",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    /// The following code in selector order, wrapping around.
    pub fn next(&self) -> CurrencyCode {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// The preceding code in selector order, wrapping around.
    pub fn previous(&self) -> CurrencyCode {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| ConverterError::UnknownCurrency(s.trim().to_string()))
    }
}

/// Rates fetched for one base currency at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base: CurrencyCode,
    pub rates: HashMap<CurrencyCode, f64>,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(base: CurrencyCode, rates: HashMap<CurrencyCode, f64>) -> Self {
        Self {
            base,
            rates,
            fetched_at: Utc::now(),
        }
    }

    pub fn rate(&self, target: CurrencyCode) -> Option<f64> {
        self.rates.get(&target).copied()
    }

    /// Time elapsed since the rates were fetched.
    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.fetched_at
    }
}

/// Source of live rates for a base currency.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, ConverterError>;
}
