use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::{Error, Result};
use crate::money::Currency;

use super::fx_model::{ExchangeQuote, NewManualRate, RateSource};
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait, RateFeedTrait};

/// Resolves exchange quotes against storage, an in-memory cache and the
/// configured rate feed.
#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
    feed: Arc<dyn RateFeedTrait>,
    cache: Arc<RwLock<HashMap<String, ExchangeQuote>>>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>, feed: Arc<dyn RateFeedTrait>) -> Self {
        Self {
            repository,
            feed,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The quote for the exact pair, from cache or storage.
    fn stored(&self, from: Currency, to: Currency) -> Result<Option<ExchangeQuote>> {
        let id = ExchangeQuote::make_id(from, to);
        {
            let cache = self
                .cache
                .read()
                .map_err(|e| Error::Unexpected(format!("Quote cache poisoned: {}", e)))?;
            if let Some(quote) = cache.get(&id) {
                return Ok(Some(quote.clone()));
            }
        }
        match (*self.repository).get_pair(from, to)? {
            Some(quote) => {
                self.remember(quote.clone())?;
                Ok(Some(quote))
            }
            None => Ok(None),
        }
    }

    /// Persists the quote and updates the cache.
    async fn store(&self, quote: ExchangeQuote) -> Result<ExchangeQuote> {
        let saved = (*self.repository).upsert(quote).await?;
        self.remember(saved.clone())?;
        Ok(saved)
    }

    fn remember(&self, quote: ExchangeQuote) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| Error::Unexpected(format!("Quote cache poisoned: {}", e)))?;
        cache.insert(quote.id.clone(), quote);
        Ok(())
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn initialize(&self) -> Result<()> {
        let quotes = (*self.repository).list()?;
        let mut cache = self
            .cache
            .write()
            .map_err(|e| Error::Unexpected(format!("Quote cache poisoned: {}", e)))?;
        cache.clear();
        for quote in quotes {
            cache.insert(quote.id.clone(), quote);
        }
        log::debug!("Primed exchange quote cache with {} pair(s)", cache.len());
        Ok(())
    }

    async fn get_rate(&self, from: Currency, to: Currency) -> Result<ExchangeQuote> {
        if from == to {
            return Ok(ExchangeQuote::identity(from));
        }

        let now = Utc::now();
        if let Some(quote) = self.stored(from, to)? {
            if quote.is_fresh(now) {
                return Ok(quote);
            }
        }

        match (*self.feed).fetch_rate(from, to).await {
            Ok(rate) => {
                let quote = ExchangeQuote::new(from, to, rate, self.feed.source());
                return self.store(quote).await;
            }
            Err(e) => {
                log::warn!("Rate feed failed for {}/{}: {}", from, to, e);
            }
        }

        // A fresh opposite-direction quote still prices the pair.
        if let Some(inverse) = self.stored(to, from)? {
            if inverse.is_fresh(now) {
                if let Some(derived) = inverse.inverted() {
                    return Ok(derived);
                }
            }
        }

        Err(Error::RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    async fn list_rates(&self, base: Currency) -> Result<Vec<ExchangeQuote>> {
        let mut quotes = Vec::new();
        for currency in Currency::ALL {
            if currency == base {
                continue;
            }
            match self.get_rate(base, currency).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    log::debug!("No quote for {}/{}: {}", base, currency, e);
                }
            }
        }
        Ok(quotes)
    }

    async fn upsert_manual_rate(&self, new_rate: NewManualRate) -> Result<ExchangeQuote> {
        let (from, to) = new_rate.validate()?;
        let quote = ExchangeQuote::new(from, to, new_rate.rate, RateSource::Manual);
        self.store(quote).await
    }

    fn supported_currencies(&self) -> Vec<Currency> {
        Currency::ALL.to_vec()
    }
}
