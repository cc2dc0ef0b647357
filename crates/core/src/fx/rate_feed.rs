use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::RATE_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::money::Currency;

use super::fx_traits::RateFeedTrait;

/// Deterministic rate feed backed by a fixed USD table.
///
/// Keeps the platform fully operational without network access. Cross rates
/// are derived through USD and rounded to rate precision.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackRateFeed;

impl FallbackRateFeed {
    pub fn new() -> Self {
        Self
    }

    /// Units of `currency` bought by one USD.
    fn per_usd(currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => Decimal::ONE,
            Currency::Eur => dec!(0.92),
            Currency::Gbp => dec!(0.79),
            Currency::Chf => dec!(0.88),
            Currency::Jpy => dec!(149.50),
            Currency::Cad => dec!(1.36),
            Currency::Aud => dec!(1.53),
            Currency::Nzd => dec!(1.64),
            Currency::Sgd => dec!(1.34),
            Currency::Hkd => dec!(7.82),
        }
    }
}

#[async_trait]
impl RateFeedTrait for FallbackRateFeed {
    async fn fetch_rate(&self, from: Currency, to: Currency) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        let rate = Self::per_usd(to) / Self::per_usd(from);
        Ok(rate.round_dp(RATE_DECIMAL_PRECISION))
    }

    fn source(&self) -> super::fx_model::RateSource {
        super::fx_model::RateSource::Fallback
    }
}
