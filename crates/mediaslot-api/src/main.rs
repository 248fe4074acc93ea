use mediaslot_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    mediaslot_infra::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage namespaces, cache, services, routes)
    let (app, sweeper) = mediaslot_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    mediaslot_api::setup::server::start_server(&config, app).await?;

    sweeper.abort();

    Ok(())
}
