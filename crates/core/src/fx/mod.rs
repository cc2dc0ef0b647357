//! Exchange rates and cross-currency conversion.

mod converter;
mod fx_model;
mod fx_service;
mod fx_traits;
mod rate_feed;

// Re-export the public interface
pub use converter::ConversionService;
pub use fx_model::{Conversion, ExchangeQuote, NewManualRate, RateSource};
pub use fx_service::FxService;
pub use fx_traits::{ConversionServiceTrait, FxRepositoryTrait, FxServiceTrait, RateFeedTrait};
pub use rate_feed::FallbackRateFeed;
