use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use billfold_core::ledger::{Transaction, TransactionFilter};
use billfold_core::wallets::{NewWallet, Wallet};

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewWallet>,
) -> ApiResult<(StatusCode, Json<Wallet>)> {
    let wallet = state.wallet_service.create_wallet(body).await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

async fn list_wallets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Wallet>>> {
    Ok(Json(state.wallet_service.list_wallets()?))
}

async fn get_wallet(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Wallet>> {
    Ok(Json(state.wallet_service.get_wallet(id)?))
}

async fn delete_wallet(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.wallet_service.delete_wallet(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyMovementRequest {
    amount: Decimal,
    description: Option<String>,
}

async fn deposit(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<MoneyMovementRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let tx = state
        .ledger_service
        .deposit(id, body.amount, body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

async fn withdraw(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<MoneyMovementRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let tx = state
        .ledger_service
        .withdraw(id, body.amount, body.description)
        .await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryQuery {
    page: Option<i64>,
    size: Option<i64>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

async fn list_transactions(
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let filter = TransactionFilter {
        page: query.page,
        size: query.size,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    Ok(Json(state.ledger_service.list_transactions(id, filter)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets", get(list_wallets).post(create_wallet))
        .route("/wallets/{id}", get(get_wallet).delete(delete_wallet))
        .route("/wallets/{id}/deposit", post(deposit))
        .route("/wallets/{id}/withdraw", post(withdraw))
        .route("/wallets/{id}/transactions", get(list_transactions))
}
