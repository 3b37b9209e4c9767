//! Failure taxonomy shared by the conversion and ticker paths

use crate::core::currency::CurrencyCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConverterError {
    #[error("amount must be a positive number")]
    InvalidInput,
    #[error("provider unavailable: HTTP {0}")]
    ProviderUnavailable(u16),
    #[error("provider rejected request: {0}")]
    ProviderRejected(String),
    #[error("connectivity failure: {0}")]
    ConnectivityFailure(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("no rate available for {0}")]
    TargetRateUnavailable(CurrencyCode),
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

impl ConverterError {
    /// Status line shown after a failed conversion.
    pub fn status_message(&self) -> &'static str {
        match self {
            ConverterError::InvalidInput | ConverterError::UnknownCurrency(_) => "Invalid input",
            ConverterError::ProviderUnavailable(_) => "API failed",
            ConverterError::ProviderRejected(_) => "API error",
            ConverterError::ConnectivityFailure(_)
            | ConverterError::Protocol(_)
            | ConverterError::TargetRateUnavailable(_) => "Network error",
        }
    }

    pub fn alert_title(&self) -> &'static str {
        match self {
            ConverterError::InvalidInput | ConverterError::UnknownCurrency(_) => "Invalid Input",
            ConverterError::ProviderUnavailable(_) | ConverterError::ProviderRejected(_) => {
                "API Error"
            }
            ConverterError::ConnectivityFailure(_)
            | ConverterError::Protocol(_)
            | ConverterError::TargetRateUnavailable(_) => "Network Error",
        }
    }

    pub fn alert_text(&self) -> String {
        match self {
            ConverterError::InvalidInput => "Enter a valid positive number (e.g., 100).".to_string(),
            ConverterError::UnknownCurrency(code) => format!("Unsupported currency: {code}"),
            ConverterError::ProviderUnavailable(status) => format!("API returned {status}"),
            ConverterError::ProviderRejected(_) => "Could not fetch live rates.".to_string(),
            ConverterError::ConnectivityFailure(_)
            | ConverterError::Protocol(_)
            | ConverterError::TargetRateUnavailable(_) => {
                "Internet/API blocked. Try again.".to_string()
            }
        }
    }

    /// Text shown in place of the ticker when a ticker fetch fails.
    pub fn ticker_message(&self) -> &'static str {
        match self {
            ConverterError::ProviderUnavailable(_) => "Ticker API blocked / network issue",
            ConverterError::ProviderRejected(_) => "Ticker error: could not load rates",
            _ => "Ticker error: network problem",
        }
    }
}
