//! Background loop that executes due scheduled payments.
//!
//! Runs the engine once per configured interval and logs a reminder line for
//! payments coming due shortly. Tick failures are logged and never stop the
//! loop.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use billfold_core::constants::REMINDER_WINDOW_DAYS;

use crate::config::Config;
use crate::main_lib::AppState;

/// Initial delay before the first tick, letting the server finish booting.
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts the payment scheduler, unless disabled by configuration.
pub fn start_payment_scheduler(state: Arc<AppState>, config: &Config) {
    if !config.scheduler_enabled {
        info!("Payment scheduler disabled by configuration");
        return;
    }
    let tick_secs = config.scheduler_interval_secs.max(1);

    tokio::spawn(async move {
        info!("Payment scheduler started ({}s interval)", tick_secs);
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticks = interval(Duration::from_secs(tick_secs));
        loop {
            ticks.tick().await;
            run_tick(&state).await;
        }
    });
}

async fn run_tick(state: &Arc<AppState>) {
    let today = Utc::now().date_naive();

    match state.payment_engine.run_due_payments(today).await {
        Ok(summary) if summary.due > 0 => {
            info!("Scheduled payment run: {}", summary);
        }
        Ok(_) => {}
        Err(e) => {
            error!("Scheduled payment run failed: {}", e);
        }
    }

    match state
        .payment_engine
        .upcoming_payments(today, REMINDER_WINDOW_DAYS)
    {
        Ok(upcoming) => {
            for payment in upcoming {
                info!(
                    "Reminder: payment {} ({}) due on {}",
                    payment.id, payment.description, payment.next_execution_date
                );
            }
        }
        Err(e) => {
            warn!("Could not load upcoming payments: {}", e);
        }
    }
}
