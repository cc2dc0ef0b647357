//! REST routing: per-area routers merged under `/api`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::attach_error_path;
use crate::main_lib::AppState;

pub mod exchange;
pub mod health;
pub mod reports;
pub mod scheduled_payments;
pub mod transactions;
pub mod wallets;

fn cors_layer(config: &Config) -> CorsLayer {
    let configured = config.cors_allow_origins.trim();
    if configured == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<HeaderValue> = configured
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .merge(wallets::router())
        .merge(transactions::router())
        .merge(exchange::router())
        .merge(scheduled_payments::router())
        .merge(reports::router())
        .merge(health::router())
        .layer(axum::middleware::from_fn(attach_error_path));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
        .layer(cors_layer(config))
        .with_state(state)
}
