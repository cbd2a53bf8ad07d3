use pokedex_api::config::AppConfig;
use pokedex_api::store::PostgresStore;
use pokedex_api::{build_app, run_server, seed};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, sqlx query logs suppressed; RUST_LOG overrides both
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,sqlx=warn"))
        .init();

    log::info!("Pokédex API server");

    // Load configuration
    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}, uploads={}",
        config.server_address(),
        config.uploads.directory
    );

    // Storage is required: failing to connect ends the process
    log::info!("Connecting to PostgreSQL...");
    let postgres_store =
        PostgresStore::new(&config.database_url(), config.database.max_connections).await?;

    if config.database.ensure_schema {
        postgres_store.ensure_schema().await?;
        log::info!("Catalog schema ready");
    }

    let store = Arc::new(postgres_store);

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Pokédex server running on http://{}", bind_address);

    run_server(listener, build_app(store, &config.uploads)).await
}
