use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};
use crate::ledger::{LedgerServiceTrait, Transaction, TransferConversion};
use crate::money::{Currency, Money};
use crate::wallets::{wallet_not_found, WalletRepositoryTrait};

use super::fx_model::Conversion;
use super::fx_traits::{ConversionServiceTrait, FxServiceTrait};

/// Prices and executes cross-currency transfers.
///
/// Pricing reads a quote and rounds half to even at the target currency's
/// minor units. Execution hands the priced conversion to the ledger, which
/// owns the wallet locks and the atomic double move.
pub struct ConversionService {
    fx: Arc<dyn FxServiceTrait>,
    wallets: Arc<dyn WalletRepositoryTrait>,
    ledger: Arc<dyn LedgerServiceTrait>,
}

impl ConversionService {
    pub fn new(
        fx: Arc<dyn FxServiceTrait>,
        wallets: Arc<dyn WalletRepositoryTrait>,
        ledger: Arc<dyn LedgerServiceTrait>,
    ) -> Self {
        Self {
            fx,
            wallets,
            ledger,
        }
    }
}

#[async_trait]
impl ConversionServiceTrait for ConversionService {
    async fn calculate(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Result<Conversion> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "amount: must be positive".to_string(),
            )));
        }
        let quote = self.fx.get_rate(from, to).await?;
        let converted = Money {
            amount: amount * quote.rate,
            currency: to,
        }
        .round_to_minor_units();
        Ok(Conversion {
            source_amount: amount,
            source_currency: from,
            converted_amount: converted.amount,
            target_currency: to,
            exchange_rate: quote.rate,
        })
    }

    async fn convert_transfer(
        &self,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<(Transaction, Conversion)> {
        if source_wallet_id == destination_wallet_id {
            return Err(Error::InvalidTransfer(
                "source and destination wallets are identical".to_string(),
            ));
        }
        let source = (*self.wallets)
            .get_by_id(source_wallet_id)
            .map_err(|e| wallet_not_found(e, source_wallet_id))?;
        let destination = (*self.wallets)
            .get_by_id(destination_wallet_id)
            .map_err(|e| wallet_not_found(e, destination_wallet_id))?;

        // Wallet currencies are immutable, so pricing outside the ledger
        // locks cannot go stale.
        let conversion = self
            .calculate(amount, source.currency, destination.currency)
            .await?;
        let transaction = self
            .ledger
            .transfer_with_conversion(
                source_wallet_id,
                destination_wallet_id,
                amount,
                TransferConversion {
                    converted_amount: conversion.converted_amount,
                    target_currency: conversion.target_currency,
                    exchange_rate: conversion.exchange_rate,
                },
                description,
            )
            .await?;
        Ok((transaction, conversion))
    }
}
