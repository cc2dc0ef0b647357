use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use billfold_core::fx::{ExchangeQuote, NewManualRate};
use billfold_core::money::Currency;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatesQuery {
    base_currency: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RatesResponse {
    base_currency: Currency,
    rates: BTreeMap<String, Decimal>,
    timestamp: DateTime<Utc>,
}

async fn list_rates(
    Query(query): Query<RatesQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RatesResponse>> {
    let base = Currency::from_code(&query.base_currency)?;
    let quotes = state.fx_service.list_rates(base).await?;
    let rates = quotes
        .into_iter()
        .map(|q| (q.to_currency.as_str().to_string(), q.rate))
        .collect();
    Ok(Json(RatesResponse {
        base_currency: base,
        rates,
        timestamp: Utc::now(),
    }))
}

async fn list_currencies(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Currency>>> {
    Ok(Json(state.fx_service.supported_currencies()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateQuery {
    amount: Decimal,
    source_currency: String,
    target_currency: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    converted_amount: Decimal,
    exchange_rate: Decimal,
}

async fn calculate(
    Query(query): Query<CalculateQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CalculateResponse>> {
    let from = Currency::from_code(&query.source_currency)?;
    let to = Currency::from_code(&query.target_currency)?;
    let conversion = state
        .conversion_service
        .calculate(query.amount, from, to)
        .await?;
    Ok(Json(CalculateResponse {
        converted_amount: conversion.converted_amount,
        exchange_rate: conversion.exchange_rate,
    }))
}

async fn upsert_manual_rate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewManualRate>,
) -> ApiResult<Json<ExchangeQuote>> {
    Ok(Json(state.fx_service.upsert_manual_rate(body).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrossCurrencyTransferRequest {
    source_wallet_id: Uuid,
    destination_wallet_id: Uuid,
    amount: Decimal,
    description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CrossCurrencyTransferResponse {
    transaction_id: Uuid,
    source_amount: Decimal,
    source_currency: Currency,
    target_amount: Decimal,
    target_currency: Currency,
    exchange_rate: Decimal,
    timestamp: DateTime<Utc>,
}

async fn cross_currency_transfer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CrossCurrencyTransferRequest>,
) -> ApiResult<(StatusCode, Json<CrossCurrencyTransferResponse>)> {
    let (tx, conversion) = state
        .conversion_service
        .convert_transfer(
            body.source_wallet_id,
            body.destination_wallet_id,
            body.amount,
            body.description,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CrossCurrencyTransferResponse {
            transaction_id: tx.id,
            source_amount: conversion.source_amount,
            source_currency: conversion.source_currency,
            target_amount: conversion.converted_amount,
            target_currency: conversion.target_currency,
            exchange_rate: conversion.exchange_rate,
            timestamp: tx.created_at,
        }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/exchange/rates", get(list_rates).post(upsert_manual_rate))
        .route("/exchange/currencies", get(list_currencies))
        .route("/exchange/calculate", get(calculate))
        .route("/exchange/transfer", post(cross_currency_transfer))
}
