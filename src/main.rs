use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = memsync::config::load_config()?;
    memsync::config::validate_config(&config)?;

    // RUST_LOG overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    info!(
        "Starting memsync v{} for {}",
        env!("CARGO_PKG_VERSION"),
        config.process.name
    );

    #[cfg(not(windows))]
    {
        anyhow::bail!("memsync can only attach to a target process on Windows");
    }

    #[cfg(windows)]
    {
        use memsync::process::WindowsTargetProvider;
        use memsync::sync::SyncService;

        let service = SyncService::new(config.poll.intervals());
        let roster = memsync::roster::build(&config, &service)?;
        info!(entities = roster.entities.len(), "entity roster registered");

        service.attach(WindowsTargetProvider::new(&config))?;

        info!("Attachment loop running. Press Ctrl+C to stop.");
        tokio::signal::ctrl_c().await?;

        service.stop().await;
        info!("Shut down cleanly");
        Ok(())
    }
}
