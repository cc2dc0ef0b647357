use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use billfold_core::reporting::{ExportFormat, MonthlySummary, Statement};

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementQuery {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

async fn statement(
    Path(id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Statement>> {
    Ok(Json(state.reporting_service.statement(
        id,
        query.start_date,
        query.end_date,
    )?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthQuery {
    year: i32,
    month: u32,
}

async fn monthly_summary(
    Path(id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MonthlySummary>> {
    Ok(Json(state.reporting_service.monthly_summary(
        id,
        query.year,
        query.month,
    )?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportQuery {
    format: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

async fn export_statement(
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let format = ExportFormat::from_str(&query.format)?;
    let export = state.reporting_service.export_statement(
        id,
        query.start_date,
        query.end_date,
        format,
    )?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/wallets/{id}/statement", get(statement))
        .route("/reports/wallets/{id}/monthly-summary", get(monthly_summary))
        .route("/reports/wallets/{id}/export", get(export_statement))
}
