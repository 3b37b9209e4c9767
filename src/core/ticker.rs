//! Ticker text for the scrolling rates strip.
use crate::core::currency::{CurrencyCode, RateSnapshot};

/// Currencies shown in the ticker, in display order.
pub const TICKER_CURRENCIES: [CurrencyCode; 11] = [
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

pub const TICKER_SEPARATOR: &str = "   |   ";
pub const TICKER_LOADING: &str = "Loading live rates ticker...";
pub const TICKER_EMPTY: &str = "Ticker: no rates";

pub fn build_ticker(base: CurrencyCode, snapshot: &RateSnapshot) -> String {
    let entries: Vec<String> = TICKER_CURRENCIES
        .iter()
        .filter(|code| **code != base)
        .filter_map(|code| {
            snapshot
                .rate(*code)
                .map(|rate| format!("{base}→{code} {rate:.4}"))
        })
        .collect();

    if entries.is_empty() {
        TICKER_EMPTY.to_string()
    } else {
        entries.join(TICKER_SEPARATOR)
    }
}

/// Decorates ticker text as the full `LIVE RATES` strip.
pub fn ticker_strip(text: &str) -> String {
    format!("LIVE RATES{TICKER_SEPARATOR}{text}{TICKER_SEPARATOR}")
}

/// Right-to-left scrolling of a strip by rotating one character per tick.
#[derive(Debug, Clone, Default)]
pub struct Marquee {
    chars: Vec<char>,
}

impl Marquee {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Replaces the text and restarts scrolling from its first character.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
    }

    pub fn advance(&mut self) {
        if !self.chars.is_empty() {
            self.chars.rotate_left(1);
        }
    }

    /// The leftmost `width` characters of the current frame.
    pub fn frame(&self, width: usize) -> String {
        self.chars.iter().take(width).collect()
    }
}
