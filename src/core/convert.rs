//! Amount parsing and the conversion engine.
use crate::core::currency::{CurrencyCode, RateProvider, RateSnapshot};
use crate::core::error::ConverterError;
use tracing::debug;

/// A validated request to convert `amount` from `base` into `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub base: CurrencyCode,
    pub target: CurrencyCode,
}

/// Outcome of a conversion, kept at full precision until it is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub converted: f64,
    pub rate: f64,
}

impl ConversionResult {
    pub fn result_text(&self) -> String {
        format!("Result: {} {}", format_amount(self.converted), self.target)
    }

    pub fn rate_text(&self) -> String {
        if self.base == self.target {
            format!("Rate: 1 {} = 1 {}", self.base, self.target)
        } else {
            format!("Rate: 1 {} = {:.6} {}", self.base, self.rate, self.target)
        }
    }
}

/// Parses user input into a positive amount. Accepts `,` thousands separators.
pub fn parse_amount(text: &str) -> Result<f64, ConverterError> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return Err(ConverterError::InvalidInput);
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConverterError::InvalidInput),
    }
}

/// Converts `amount` using `rates`, which may be omitted for same-currency pairs.
pub fn convert(
    amount: f64,
    base: CurrencyCode,
    target: CurrencyCode,
    rates: Option<&RateSnapshot>,
) -> Result<ConversionResult, ConverterError> {
    if base == target {
        return Ok(ConversionResult {
            amount,
            base,
            target,
            converted: amount,
            rate: 1.0,
        });
    }

    let rate = rates
        .and_then(|snapshot| snapshot.rate(target))
        .ok_or(ConverterError::TargetRateUnavailable(target))?;

    // Finite inputs can still overflow, e.g. 1e308 into JPY.
    let converted = amount * rate;
    if !converted.is_finite() {
        return Err(ConverterError::InvalidInput);
    }

    Ok(ConversionResult {
        amount,
        base,
        target,
        converted,
        rate,
    })
}

/// Runs a conversion, fetching a snapshot only when the pair differs.
pub async fn perform(
    request: ConversionRequest,
    provider: &dyn RateProvider,
) -> Result<ConversionResult, ConverterError> {
    if request.base == request.target {
        debug!(currency = %request.base, "Same-currency conversion, skipping fetch");
        return convert(request.amount, request.base, request.target, None);
    }

    let snapshot = provider.fetch_rates(request.base).await?;
    convert(request.amount, request.base, request.target, Some(&snapshot))
}

/// Formats an amount with two decimals and `,` grouping, e.g. `1,234.57`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
