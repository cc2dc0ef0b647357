use billfold_server::api::app_router;
use billfold_server::{build_state, init_tracing, scheduler, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    scheduler::start_payment_scheduler(state.clone(), &config);

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
