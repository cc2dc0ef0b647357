use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::Transaction;
use crate::money::Currency;

use super::fx_model::{Conversion, ExchangeQuote, NewManualRate, RateSource};

/// Source of external exchange rates.
///
/// The deployed feed is the deterministic fallback table; tests inject fixed
/// or failing feeds to drive the resolution order.
#[async_trait]
pub trait RateFeedTrait: Send + Sync {
    /// The current rate for the directional pair.
    async fn fetch_rate(&self, from: Currency, to: Currency) -> Result<Decimal>;

    /// How quotes produced by this feed are labelled.
    fn source(&self) -> RateSource {
        RateSource::Feed
    }
}

/// Trait defining exchange quote persistence operations.
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    /// Inserts or replaces the quote stored for its pair.
    async fn upsert(&self, quote: ExchangeQuote) -> Result<ExchangeQuote>;

    /// The stored quote for the exact directional pair, if any.
    fn get_pair(&self, from: Currency, to: Currency) -> Result<Option<ExchangeQuote>>;

    /// All stored quotes.
    fn list(&self) -> Result<Vec<ExchangeQuote>>;
}

/// Trait defining exchange rate resolution operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Primes the in-memory quote cache from storage.
    fn initialize(&self) -> Result<()>;

    /// Resolves a usable quote for the directional pair, refreshing or
    /// deriving as needed.
    async fn get_rate(&self, from: Currency, to: Currency) -> Result<ExchangeQuote>;

    /// Quotes from `base` to every other supported currency, skipping pairs
    /// with no producible quote.
    async fn list_rates(&self, base: Currency) -> Result<Vec<ExchangeQuote>>;

    /// Stores an operator-entered rate for a pair.
    async fn upsert_manual_rate(&self, new_rate: NewManualRate) -> Result<ExchangeQuote>;

    /// Currencies wallets can be denominated in.
    fn supported_currencies(&self) -> Vec<Currency>;
}

/// Trait defining cross-currency conversion operations.
#[async_trait]
pub trait ConversionServiceTrait: Send + Sync {
    /// Prices a conversion without moving money.
    async fn calculate(&self, amount: Decimal, from: Currency, to: Currency)
        -> Result<Conversion>;

    /// Executes a transfer between two wallets of different currencies,
    /// converting at the current rate.
    async fn convert_transfer(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<(Transaction, Conversion)>;
}
