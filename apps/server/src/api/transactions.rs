use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use billfold_core::ledger::{Transaction, TransactionStatus};
use billfold_core::money::Currency;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest {
    source_wallet_id: Uuid,
    destination_wallet_id: Uuid,
    amount: Decimal,
    description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferResponse {
    transaction_id: Uuid,
    source_wallet_id: Option<Uuid>,
    destination_wallet_id: Option<Uuid>,
    amount: Decimal,
    currency: Currency,
    status: TransactionStatus,
    timestamp: DateTime<Utc>,
}

impl From<Transaction> for TransferResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            transaction_id: tx.id,
            source_wallet_id: tx.source_wallet_id,
            destination_wallet_id: tx.destination_wallet_id,
            amount: tx.amount,
            currency: tx.currency,
            status: tx.status,
            timestamp: tx.created_at,
        }
    }
}

async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TransferRequest>,
) -> ApiResult<(StatusCode, Json<TransferResponse>)> {
    let tx = state
        .ledger_service
        .transfer(
            body.source_wallet_id,
            body.destination_wallet_id,
            body.amount,
            body.description,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tx.into())))
}

async fn get_transaction(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Transaction>> {
    Ok(Json(state.ledger_service.get_transaction(id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/transactions/transfer", post(transfer))
        .route("/transactions/{id}", get(get_transaction))
}
