//! Money module - currency registry and exact-decimal amounts.

mod currency;
mod money_model;

pub use currency::Currency;
pub use money_model::Money;
