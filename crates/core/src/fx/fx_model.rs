use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{QUOTE_FRESHNESS_SECS, RATE_DECIMAL_PRECISION};
use crate::errors::{Error, Result, ValidationError};
use crate::money::Currency;

/// Where a quote's rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateSource {
    /// Fetched from the configured rate feed.
    Feed,
    /// Served by the built-in fallback table.
    Fallback,
    /// Entered by an operator.
    #[default]
    Manual,
    /// Computed as the inverse of the opposite pair.
    Derived,
}

impl RateSource {
    /// Returns the string identifier for this rate source.
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Feed => "FEED",
            RateSource::Fallback => "FALLBACK",
            RateSource::Manual => "MANUAL",
            RateSource::Derived => "DERIVED",
        }
    }
}

impl From<RateSource> for String {
    fn from(source: RateSource) -> Self {
        source.as_str().to_string()
    }
}

impl From<&str> for RateSource {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "FEED" => RateSource::Feed,
            "FALLBACK" => RateSource::Fallback,
            "DERIVED" => RateSource::Derived,
            _ => RateSource::Manual,
        }
    }
}

/// A directional exchange rate observation.
///
/// EUR→USD and USD→EUR are independent entries; the id is the pair key
/// (`"EUR-USD"`). A quote older than the freshness window is stale and must
/// be refreshed before a conversion may use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeQuote {
    pub id: String,
    pub from_currency: Currency,
    pub to_currency: Currency,
    #[serde(serialize_with = "serialize_rate")]
    pub rate: Decimal,
    pub source: RateSource,
    pub fetched_at: DateTime<Utc>,
}

impl ExchangeQuote {
    /// Builds the pair key, e.g. `"EUR-USD"`.
    pub fn make_id(from: Currency, to: Currency) -> String {
        format!("{}-{}", from, to)
    }

    /// A quote fetched just now.
    pub fn new(from: Currency, to: Currency, rate: Decimal, source: RateSource) -> Self {
        Self {
            id: Self::make_id(from, to),
            from_currency: from,
            to_currency: to,
            rate,
            source,
            fetched_at: Utc::now(),
        }
    }

    /// The rate-1 quote for a currency against itself.
    pub fn identity(currency: Currency) -> Self {
        Self::new(currency, currency, Decimal::ONE, RateSource::Manual)
    }

    /// True while the quote is younger than the freshness window.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) <= Duration::seconds(QUOTE_FRESHNESS_SECS)
    }

    /// The opposite-direction quote derived from this one, or `None` for a
    /// zero rate.
    pub fn inverted(&self) -> Option<ExchangeQuote> {
        if self.rate.is_zero() {
            return None;
        }
        Some(ExchangeQuote {
            id: Self::make_id(self.to_currency, self.from_currency),
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            rate: (Decimal::ONE / self.rate).round_dp(RATE_DECIMAL_PRECISION),
            source: RateSource::Derived,
            fetched_at: self.fetched_at,
        })
    }
}

fn serialize_rate<S>(decimal: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(RATE_DECIMAL_PRECISION);
    serializer.serialize_str(&rounded.to_string())
}

/// Operator-entered rate override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManualRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
}

impl NewManualRate {
    /// Validates the override and resolves both currency codes.
    pub fn validate(&self) -> Result<(Currency, Currency)> {
        let from = Currency::from_code(&self.from_currency)?;
        let to = Currency::from_code(&self.to_currency)?;
        if from == to {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "toCurrency: must differ from fromCurrency".to_string(),
            )));
        }
        if self.rate <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "rate: must be positive".to_string(),
            )));
        }
        Ok((from, to))
    }
}

/// The priced result of a conversion, before or after execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub source_amount: Decimal,
    pub source_currency: Currency,
    pub converted_amount: Decimal,
    pub target_currency: Currency,
    pub exchange_rate: Decimal,
}
