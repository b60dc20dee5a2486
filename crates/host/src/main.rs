//! Irrigation Controller Host - Main Entry Point

use anyhow::Context;
use irrigation_host::{init_logging, run, Settings};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let settings = Settings::load(config_path.as_deref()).context("Failed to load settings")?;
    init_logging(&settings.log_level).context("Failed to initialize logging")?;

    info!("=== Irrigation Controller v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Serving {} every {:?}", settings.serial.device, settings.tick());

    run(settings).await.context("Controller loop failed")?;
    Ok(())
}
