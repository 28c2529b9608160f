use route_server::config::ServerConfig;
use route_server::network::{InMemoryNetwork, Seed, load_seed};
use route_server::web::{AppState, create_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Seed file takes precedence over the sample network
    let seed = match (&config.seed_file, config.seed_sample) {
        (Some(path), _) => {
            tracing::info!(path = %path.display(), "loading seed file");
            Some(load_seed(path)?)
        }
        (None, true) => Some(Seed::sample()),
        (None, false) => None,
    };

    let network = InMemoryNetwork::new();
    if let Some(seed) = seed {
        let summary = network.apply_seed(&seed).await?;
        tracing::info!(
            locations = summary.locations,
            transportations = summary.transportations,
            "seeded network"
        );
    }

    let state = AppState::new(network, config.cache.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %config.addr,
        routes_ttl_secs = config.cache.routes_ttl.as_secs(),
        max_capacity = config.cache.max_capacity,
        "route server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("route server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
