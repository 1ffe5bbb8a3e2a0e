use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &gastos::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        data_dir = %cfg.data_dir.display(),
        file_name = %cfg.file_name,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        on_corrupt = ?cfg.on_corrupt
    );

    if !cfg.data_dir.exists() {
        std::fs::create_dir_all(&cfg.data_dir)?;
        info!(path = %cfg.data_dir.display(), "created data directory");
    }

    let repo = gastos::ExpenseRepository::from_config(cfg);
    let handle = gastos::service::expenses_actor::spawn(repo).await?;

    let state = gastos::router::GastosState::new(handle);
    let app = gastos::router::gastos_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;
    Ok(())
}
