//! Supported currency registry.
//!
//! Wallets hold balances in a closed set of ISO 4217 currencies. Codes outside
//! the registry are rejected with `UnsupportedCurrency` before any ledger work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// A currency the platform can hold wallet balances in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Chf,
    Jpy,
    Cad,
    Aud,
    Nzd,
    Sgd,
    Hkd,
}

impl Currency {
    /// Every currency in the registry, in listing order.
    pub const ALL: [Currency; 10] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Chf,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
        Currency::Nzd,
        Currency::Sgd,
        Currency::Hkd,
    ];

    /// Returns the alpha-3 code for this currency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Nzd => "NZD",
            Currency::Sgd => "SGD",
            Currency::Hkd => "HKD",
        }
    }

    /// Number of digits after the decimal point in the currency's minor unit.
    /// JPY has none; every other supported currency has two.
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }

    /// Parses an alpha-3 code, case-insensitively.
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "CHF" => Ok(Currency::Chf),
            "JPY" => Ok(Currency::Jpy),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            "NZD" => Ok(Currency::Nzd),
            "SGD" => Ok(Currency::Sgd),
            "HKD" => Ok(Currency::Hkd),
            _ => Err(Error::UnsupportedCurrency(code.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}
