use anyhow::Result;
use timexp_daemon::{config::DaemonConfig, daemon};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DaemonConfig::load();
    let log_level =
        config.as_ref().map(|c| c.general.log_level.clone()).unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    info!("Starting TimeXP daemon");

    if let Err(e) = daemon::run(config?).await {
        error!("Daemon error: {}", e);
        return Err(e);
    }

    info!("TimeXP daemon stopped");
    Ok(())
}
