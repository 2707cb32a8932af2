use anyhow::{anyhow, Context};
use zentask_core::{init_logging, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real env vars still apply.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(config.log_level, config.log_dir.as_deref())
        .map_err(|message| anyhow!("logging init failed: {message}"))?;

    zentask_server::run_server(&config).await
}
