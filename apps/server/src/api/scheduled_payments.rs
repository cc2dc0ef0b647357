use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use billfold_core::scheduled::{NewScheduledPayment, ScheduledPayment};

use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn create_payment(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<NewScheduledPayment>,
) -> ApiResult<(StatusCode, Json<ScheduledPayment>)> {
    // clients following the "0 = unlimited" convention
    if body.max_executions == Some(0) {
        body.max_executions = None;
    }
    let payment = state.scheduled_service.create_payment(body).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn list_payments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ScheduledPayment>>> {
    Ok(Json(state.scheduled_service.list_payments()?))
}

async fn get_payment(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ScheduledPayment>> {
    Ok(Json(state.scheduled_service.get_payment(id)?))
}

async fn list_for_wallet(
    Path(wallet_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ScheduledPayment>>> {
    Ok(Json(state.scheduled_service.list_for_wallet(wallet_id)?))
}

async fn pause_payment(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ScheduledPayment>> {
    Ok(Json(state.scheduled_service.pause_payment(id).await?))
}

async fn resume_payment(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ScheduledPayment>> {
    Ok(Json(state.scheduled_service.resume_payment(id).await?))
}

async fn cancel_payment(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ScheduledPayment>> {
    Ok(Json(state.scheduled_service.cancel_payment(id).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/scheduled-payments",
            get(list_payments).post(create_payment),
        )
        .route("/scheduled-payments/{id}", get(get_payment))
        .route("/scheduled-payments/wallet/{walletId}", get(list_for_wallet))
        .route("/scheduled-payments/{id}/pause", post(pause_payment))
        .route("/scheduled-payments/{id}/resume", post(resume_payment))
        .route("/scheduled-payments/{id}/cancel", post(cancel_payment))
}
