//! # fedstr
//!
//! Main binary: a Nostr relay that answers queries by fetching and
//! converting ActivityPub objects on demand.
//!
//! Wires together:
//! - configuration and logging
//! - the database (identity mappings and fetch cache)
//! - the ActivityPub fetcher and the query translator
//! - the cache expiry task
//! - the relay's HTTP/WebSocket router

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use fedstr_common::keys::KeyDeriver;
use fedstr_common::validation::validate_config;
use fedstr_db::{CacheExpirer, Database, IdentityMapper};
use fedstr_federation::HttpFetcher;
use fedstr_relay::{build_router, EventConverter, QueryTranslator, RelayState};

#[derive(Parser)]
#[command(name = "fedstr")]
#[command(about = "Nostr relay backed by ActivityPub")]
struct Cli {
    /// Config file name, without extension
    #[arg(short, long, env = "FEDSTR_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = fedstr_common::config::load(cli.config.as_deref())?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fedstr=debug,tower_http=debug".into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    validate_config(&config)?;

    tracing::info!("Starting fedstr v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database and run migrations
    let db = Database::connect(&config.database).await?;
    db.migrate().await?;

    // === ActivityPub fetcher ===
    let fetcher = HttpFetcher::new(&config.fetch)?.with_actor_cache(
        db.pool.clone(),
        Duration::from_secs(config.cache.actor_ttl_secs),
    );

    // === Query translation ===
    let mapper = IdentityMapper::new(db.pool.clone());
    let converter = EventConverter::new(KeyDeriver::new(&config.bridge.secret), mapper.clone());
    let translator = QueryTranslator::new(mapper, fetcher, converter, config.fetch.concurrency);

    // === Cache expiry ===
    let expirer = CacheExpirer::new(
        db.pool.clone(),
        Duration::from_secs(config.cache.sweep_interval_secs),
    );
    let _expiry = expirer.spawn();

    // === Relay ===
    let state = RelayState::new(db, translator, &config.server, &config.relay);
    let router = build_router(state);
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Relay listening on ws://{addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
