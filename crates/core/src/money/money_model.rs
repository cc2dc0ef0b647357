//! Exact-decimal monetary amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::currency::Currency;
use crate::errors::{Error, Result, ValidationError};

/// An amount of money in a single currency.
///
/// Arithmetic is checked: currency mismatches and overflow surface as errors
/// instead of silently mixing units or wrapping. Amounts keep their exact
/// scale until explicitly rounded to the currency's minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    /// Builds a monetary amount.
    ///
    /// Rejects amounts carrying more fractional digits than the currency's
    /// minor units, so a caller can never hand the ledger sub-cent USD or
    /// fractional JPY.
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self> {
        if amount.normalize().scale() > currency.minor_units() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "amount {} has more than {} decimal place(s) for {}",
                amount,
                currency.minor_units(),
                currency
            ))));
        }
        Ok(Self { amount, currency })
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money> {
        self.require_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| Error::Unexpected("monetary addition overflowed".to_string()))?;
        Ok(Money {
            amount,
            currency: self.currency,
        })
    }

    /// Subtracts an amount of the same currency.
    pub fn checked_sub(&self, other: &Money) -> Result<Money> {
        self.require_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| Error::Unexpected("monetary subtraction overflowed".to_string()))?;
        Ok(Money {
            amount,
            currency: self.currency,
        })
    }

    /// Rounds to the currency's minor units using half-even (banker's)
    /// rounding, the rounding mode used for every currency conversion.
    pub fn round_to_minor_units(&self) -> Money {
        Money {
            amount: self.amount.round_dp_with_strategy(
                self.currency.minor_units(),
                RoundingStrategy::MidpointNearestEven,
            ),
            currency: self.currency,
        }
    }

    fn require_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "currency mismatch: {} vs {}",
                self.currency, other.currency
            ))));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

fn serialize_amount<S>(decimal: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&decimal.to_string())
}
