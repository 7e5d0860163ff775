use poolsniper::api::{self, AppState};
use poolsniper::config::Config;
use poolsniper::orchestration::run_until_shutdown;
use poolsniper::{
    logging, AppError, OgmiosFeed, PipelineStats, StreamLoop, SwapGatewayExecutor, TradeExecutor,
    TransactionFeed,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment still applies.
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    let _log_guards = logging::init_tracing(config.log_format, config.log_dir.as_deref())?;

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;

    let feed: Arc<dyn TransactionFeed> = Arc::new(OgmiosFeed::new(config.ogmios_url));
    let executor: Arc<dyn TradeExecutor> = Arc::new(
        SwapGatewayExecutor::new(
            config.swap_gateway_url,
            config.network,
            config.seed_phrase,
            config.blockfrost_key,
        )
        .map_err(|e| AppError::Internal(e.to_string()))?,
    );
    let stats = Arc::new(PipelineStats::new());

    let stream = StreamLoop::new(feed, executor, config.strategy)
        .with_stats(stats.clone())
        .with_feed_retry_delay(config.feed_retry_delay)
        .with_shutdown_grace(config.shutdown_grace);

    tracing::info!(network = config.network.as_str(), "Started; status API on {}", addr);

    let app = api::create_router(AppState::new(stats));
    run_until_shutdown(listener, app, stream, ctrl_c()).await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until killed.
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
