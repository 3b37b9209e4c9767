//! Per-window (or per-request) UI state and the actions that mutate it.
//!
//! Both front-ends drive a [`Session`] through the same handlers so that
//! Swap, Clear, Convert and ticker refreshes behave identically. Handlers
//! that need the network are split in two: a synchronous `begin_*` step that
//! validates and updates status, and a `finish_*`/`apply_*` step that takes
//! the fetched outcome. The terminal front-end runs the fetch on another task
//! in between; the web front-end awaits it inline via [`Session::convert`].

use crate::core::convert::{self, ConversionRequest, ConversionResult};
use crate::core::currency::{CurrencyCode, RateProvider, RateSnapshot};
use crate::core::error::ConverterError;
use crate::core::ticker::{TICKER_LOADING, build_ticker, ticker_strip};
use tracing::{debug, warn};

pub const RESULT_PLACEHOLDER: &str = "Result: --";
pub const RATE_PLACEHOLDER: &str = "Rate: --";

pub const STATUS_READY: &str = "Ready";
pub const STATUS_SWAPPED: &str = "Swapped";
pub const STATUS_CLEARED: &str = "Cleared";
pub const STATUS_FETCHING: &str = "Fetching live rates";
pub const STATUS_DONE: &str = "Done";
pub const STATUS_REFRESHED: &str = "Rates refreshed";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub amount_text: String,
    pub result_text: String,
    pub rate_text: String,
    pub status: String,
    pub ticker_text: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            base: CurrencyCode::USD,
            target: CurrencyCode::GBP,
            amount_text: String::new(),
            result_text: RESULT_PLACEHOLDER.to_string(),
            rate_text: RATE_PLACEHOLDER.to_string(),
            status: STATUS_READY.to_string(),
            ticker_text: TICKER_LOADING.to_string(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_line(&self) -> String {
        format!("Status: {}", self.status)
    }

    fn set_status(&mut self, status: &str) {
        debug!(status, "Session status changed");
        self.status = status.to_string();
    }

    /// Exchanges base and target. Returns the new base, whose ticker must be refetched.
    pub fn swap(&mut self) -> CurrencyCode {
        std::mem::swap(&mut self.base, &mut self.target);
        self.set_status(STATUS_SWAPPED);
        self.base
    }

    /// Resets result and rate text. Amount and selections are kept.
    pub fn clear(&mut self) {
        self.result_text = RESULT_PLACEHOLDER.to_string();
        self.rate_text = RATE_PLACEHOLDER.to_string();
        self.set_status(STATUS_CLEARED);
    }

    /// Validates the amount and moves to the fetching state.
    pub fn begin_conversion(&mut self) -> Result<ConversionRequest, ConverterError> {
        match convert::parse_amount(&self.amount_text) {
            Ok(amount) => {
                self.set_status(STATUS_FETCHING);
                Ok(ConversionRequest {
                    amount,
                    base: self.base,
                    target: self.target,
                })
            }
            Err(e) => {
                self.set_status(e.status_message());
                Err(e)
            }
        }
    }

    /// Applies a finished conversion. Failures leave result and rate text untouched.
    pub fn finish_conversion(
        &mut self,
        outcome: Result<ConversionResult, ConverterError>,
    ) -> Result<(), ConverterError> {
        match outcome {
            Ok(result) => {
                self.result_text = result.result_text();
                self.rate_text = result.rate_text();
                self.set_status(STATUS_DONE);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Conversion failed");
                self.set_status(e.status_message());
                Err(e)
            }
        }
    }

    /// Full Convert action for callers that can await the fetch in place.
    pub async fn convert(&mut self, provider: &dyn RateProvider) -> Result<(), ConverterError> {
        let request = self.begin_conversion()?;
        let outcome = convert::perform(request, provider).await;
        self.finish_conversion(outcome)
    }

    /// Replaces the ticker text with fetched rates or a ticker-specific error.
    pub fn apply_ticker(&mut self, outcome: Result<RateSnapshot, ConverterError>) {
        self.ticker_text = match outcome {
            Ok(snapshot) => ticker_strip(&build_ticker(snapshot.base, &snapshot)),
            Err(e) => {
                warn!(error = %e, "Ticker fetch failed");
                e.ticker_message().to_string()
            }
        };
    }

    pub async fn refresh_ticker(&mut self, provider: &dyn RateProvider) {
        let outcome = provider.fetch_rates(self.base).await;
        self.apply_ticker(outcome);
    }

    pub fn mark_refreshed(&mut self) {
        self.set_status(STATUS_REFRESHED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records requested bases and replays a fixed outcome.
    struct ScriptedProvider {
        outcome: Result<RateSnapshot, ConverterError>,
        requested: Mutex<Vec<CurrencyCode>>,
    }

    impl ScriptedProvider {
        fn ok(base: CurrencyCode, rates: &[(CurrencyCode, f64)]) -> Self {
            Self::with(Ok(RateSnapshot::new(
                base,
                rates.iter().copied().collect::<HashMap<_, _>>(),
            )))
        }

        fn with(outcome: Result<RateSnapshot, ConverterError>) -> Self {
            Self {
                outcome,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<CurrencyCode> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RateProvider for ScriptedProvider {
        async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot, ConverterError> {
            self.requested.lock().unwrap().push(base);
            self.outcome.clone()
        }
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        assert_eq!(session.base, CurrencyCode::USD);
        assert_eq!(session.target, CurrencyCode::GBP);
        assert!(session.amount_text.is_empty());
        assert_eq!(session.result_text, "Result: --");
        assert_eq!(session.rate_text, "Rate: --");
        assert_eq!(session.status_line(), "Status: Ready");
        assert_eq!(session.ticker_text, "Loading live rates ticker...");
    }

    #[test]
    fn test_swap_exchanges_pair_and_reports_new_base() {
        let mut session = Session::new();
        let refetch = session.swap();
        assert_eq!(refetch, CurrencyCode::GBP);
        assert_eq!(session.base, CurrencyCode::GBP);
        assert_eq!(session.target, CurrencyCode::USD);
        assert_eq!(session.status, "Swapped");
    }

    #[test]
    fn test_clear_keeps_amount_and_selection() {
        let mut session = Session {
            amount_text: "42".to_string(),
            result_text: "Result: 33.18 GBP".to_string(),
            rate_text: "Rate: 1 USD = 0.790000 GBP".to_string(),
            base: CurrencyCode::EUR,
            ..Session::default()
        };
        session.clear();
        assert_eq!(session.amount_text, "42");
        assert_eq!(session.base, CurrencyCode::EUR);
        assert_eq!(session.result_text, RESULT_PLACEHOLDER);
        assert_eq!(session.rate_text, RATE_PLACEHOLDER);
        assert_eq!(session.status, "Cleared");
    }

    #[tokio::test]
    async fn test_convert_success() {
        let provider = ScriptedProvider::ok(CurrencyCode::USD, &[(CurrencyCode::GBP, 0.79)]);
        let mut session = Session {
            amount_text: "100".to_string(),
            ..Session::default()
        };
        session.convert(&provider).await.unwrap();
        assert_eq!(session.result_text, "Result: 79.00 GBP");
        assert_eq!(session.rate_text, "Rate: 1 USD = 0.790000 GBP");
        assert_eq!(session.status, "Done");
        assert_eq!(provider.requested(), vec![CurrencyCode::USD]);
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_provider() {
        let provider = ScriptedProvider::ok(CurrencyCode::USD, &[(CurrencyCode::GBP, 0.79)]);
        let mut session = Session {
            amount_text: "0".to_string(),
            ..Session::default()
        };
        let err = session.convert(&provider).await.unwrap_err();
        assert_eq!(err, ConverterError::InvalidInput);
        assert_eq!(session.status, "Invalid input");
        assert_eq!(session.result_text, RESULT_PLACEHOLDER);
        assert!(provider.requested().is_empty());
    }

    #[tokio::test]
    async fn test_same_currency_conversion_skips_provider() {
        let provider = ScriptedProvider::with(Err(ConverterError::ProviderUnavailable(500)));
        let mut session = Session {
            base: CurrencyCode::EUR,
            target: CurrencyCode::EUR,
            amount_text: "50".to_string(),
            ..Session::default()
        };
        session.convert(&provider).await.unwrap();
        assert_eq!(session.result_text, "Result: 50.00 EUR");
        assert_eq!(session.rate_text, "Rate: 1 EUR = 1 EUR");
        assert!(provider.requested().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_previous_result() {
        let provider = ScriptedProvider::with(Err(ConverterError::ProviderUnavailable(500)));
        let mut session = Session {
            amount_text: "10".to_string(),
            result_text: "Result: 7.90 GBP".to_string(),
            rate_text: "Rate: 1 USD = 0.790000 GBP".to_string(),
            ..Session::default()
        };
        let err = session.convert(&provider).await.unwrap_err();
        assert_eq!(err, ConverterError::ProviderUnavailable(500));
        assert_eq!(session.status, "API failed");
        assert_eq!(session.result_text, "Result: 7.90 GBP");
        assert_eq!(session.rate_text, "Rate: 1 USD = 0.790000 GBP");
    }

    #[tokio::test]
    async fn test_missing_target_rate_is_reported() {
        let provider = ScriptedProvider::ok(CurrencyCode::USD, &[(CurrencyCode::EUR, 0.92)]);
        let mut session = Session {
            amount_text: "10".to_string(),
            ..Session::default()
        };
        let err = session.convert(&provider).await.unwrap_err();
        assert_eq!(err, ConverterError::TargetRateUnavailable(CurrencyCode::GBP));
        assert_eq!(session.status, "Network error");
        assert_eq!(err.alert_title(), "Network Error");
        assert_eq!(session.result_text, "Result: --");
    }

    #[tokio::test]
    async fn test_ticker_refresh_uses_current_base() {
        let provider = ScriptedProvider::ok(
            CurrencyCode::GBP,
            &[(CurrencyCode::EUR, 1.17), (CurrencyCode::USD, 1.27)],
        );
        let mut session = Session::new();
        session.swap();
        session.refresh_ticker(&provider).await;
        assert_eq!(provider.requested(), vec![CurrencyCode::GBP]);
        assert_eq!(
            session.ticker_text,
            "LIVE RATES   |   GBP→EUR 1.1700   |   "
        );
    }

    #[test]
    fn test_ticker_failure_only_touches_ticker() {
        let mut session = Session {
            result_text: "Result: 1.00 GBP".to_string(),
            ..Session::default()
        };
        let before = session.clone();
        session.apply_ticker(Err(ConverterError::ConnectivityFailure("timed out".into())));
        assert_eq!(session.ticker_text, "Ticker error: network problem");
        assert_eq!(session.result_text, before.result_text);
        assert_eq!(session.status, before.status);
    }
}
