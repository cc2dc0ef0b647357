use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use billfold_core::fx::{
    ConversionService, ConversionServiceTrait, FallbackRateFeed, FxService, FxServiceTrait,
};
use billfold_core::ledger::{LedgerService, LedgerServiceTrait, WalletLocks};
use billfold_core::reporting::{ReportingService, ReportingServiceTrait};
use billfold_core::scheduled::{
    PaymentEngine, PaymentEngineTrait, ScheduledPaymentService, ScheduledPaymentServiceTrait,
};
use billfold_core::wallets::{WalletService, WalletServiceTrait};
use billfold_storage_sqlite::db;
use billfold_storage_sqlite::fx::FxRepository;
use billfold_storage_sqlite::ledger::LedgerRepository;
use billfold_storage_sqlite::scheduled::ScheduledPaymentRepository;
use billfold_storage_sqlite::wallets::WalletRepository;

use crate::config::Config;

pub struct AppState {
    pub wallet_service: Arc<dyn WalletServiceTrait>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub fx_service: Arc<dyn FxServiceTrait>,
    pub conversion_service: Arc<dyn ConversionServiceTrait>,
    pub scheduled_service: Arc<dyn ScheduledPaymentServiceTrait>,
    pub payment_engine: Arc<dyn PaymentEngineTrait>,
    pub reporting_service: Arc<dyn ReportingServiceTrait>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("BF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let wallet_repo = Arc::new(WalletRepository::new(pool.clone(), writer.clone()));
    let ledger_repo = Arc::new(LedgerRepository::new(pool.clone(), writer.clone()));
    let fx_repo = Arc::new(FxRepository::new(pool.clone(), writer.clone()));
    let scheduled_repo = Arc::new(ScheduledPaymentRepository::new(pool.clone(), writer.clone()));

    let fx_service = Arc::new(FxService::new(fx_repo, Arc::new(FallbackRateFeed::new())));
    fx_service.initialize()?;

    let wallet_service: Arc<dyn WalletServiceTrait> = Arc::new(WalletService::new(
        wallet_repo.clone(),
        scheduled_repo.clone(),
    ));

    let locks = Arc::new(WalletLocks::new());
    let ledger_service: Arc<dyn LedgerServiceTrait> = Arc::new(LedgerService::new(
        wallet_repo.clone(),
        ledger_repo.clone(),
        locks,
    ));

    let conversion_service: Arc<dyn ConversionServiceTrait> = Arc::new(ConversionService::new(
        fx_service.clone(),
        wallet_repo.clone(),
        ledger_service.clone(),
    ));

    let scheduled_service: Arc<dyn ScheduledPaymentServiceTrait> = Arc::new(
        ScheduledPaymentService::new(scheduled_repo.clone(), wallet_repo.clone()),
    );

    let payment_engine: Arc<dyn PaymentEngineTrait> = Arc::new(PaymentEngine::new(
        scheduled_repo,
        wallet_repo.clone(),
        ledger_service.clone(),
        conversion_service.clone(),
    ));

    let reporting_service: Arc<dyn ReportingServiceTrait> =
        Arc::new(ReportingService::new(wallet_repo, ledger_repo));

    Ok(Arc::new(AppState {
        wallet_service,
        ledger_service,
        fx_service,
        conversion_service,
        scheduled_service,
        payment_engine,
        reporting_service,
        db_path,
    }))
}
