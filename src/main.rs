use appliance_energy_api::{
    repositories::FeedRepository, routes, services::EnergyService, ApplianceRegistry, Config,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "appliance_energy_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize repository and service
    let registry = ApplianceRegistry::default();
    let feeds = FeedRepository::new(&config.feeds)?;
    let service = EnergyService::new(feeds, registry);

    // Create router
    let app = routes::create_router(service);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
