//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults
//!
//! The loaded [`AppConfig`] is an ordinary value: `main` builds it once and
//! hands the relevant sections to each component.

use serde::Deserialize;
use validator::Validate;

/// Load the configuration from defaults, an optional config file, and the
/// environment.
///
/// `file` names the config file without extension (the `config` crate probes
/// `.toml`, `.json`, ...). It is optional: a missing file is not an error.
pub fn load(file: Option<&str>) -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = config::Config::builder()
        // Defaults
        .set_default("server.name", "fedstr")?
        .set_default("server.description", "Nostr relay backed by ActivityPub")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("fetch.timeout_secs", 10)?
        .set_default("fetch.outbox_limit", 20)?
        .set_default("fetch.collection_limit", 200)?
        .set_default("fetch.concurrency", 4)?
        .set_default("cache.actor_ttl_secs", 3600)? // 1 hour
        .set_default("cache.sweep_interval_secs", 7200)? // 2 hours
        .set_default("relay.max_event_bytes", 10_000)?
        // Optional config file
        .add_source(config::File::with_name(file.unwrap_or("config")).required(false))
        // Environment variables (FEDSTR__SERVER__PORT, FEDSTR__DATABASE__URL, etc.)
        .add_source(
            config::Environment::with_prefix("FEDSTR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub database: DatabaseConfig,
    #[validate(nested)]
    pub bridge: BridgeConfig,
    #[validate(nested)]
    pub fetch: FetchConfig,
    #[validate(nested)]
    pub cache: CacheConfig,
    #[validate(nested)]
    pub relay: RelayConfig,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerConfig {
    /// Relay name advertised in the NIP-11 information document.
    #[validate(length(min = 1, message = "server.name must not be empty"))]
    pub name: String,
    pub description: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct DatabaseConfig {
    /// Connection URL. `postgres://` in production, `sqlite:` for lite mode.
    #[validate(length(min = 1, message = "database.url must not be empty"))]
    pub url: String,
    #[validate(range(min = 1, message = "database.max_connections must be at least 1"))]
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct BridgeConfig {
    /// Secret seed from which every bridged actor's Nostr key is derived.
    /// Changing it changes every bridged pubkey.
    #[validate(length(min = 16, message = "bridge.secret must be at least 16 characters"))]
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct FetchConfig {
    /// Per-request HTTP timeout for ActivityPub fetches.
    #[validate(range(min = 1, message = "fetch.timeout_secs must be at least 1"))]
    pub timeout_secs: u64,
    /// Maximum number of notes read from one outbox.
    pub outbox_limit: usize,
    /// Maximum number of entries read from a following collection.
    pub collection_limit: usize,
    /// How many items of one query are fetched concurrently.
    #[validate(range(min = 1, message = "fetch.concurrency must be at least 1"))]
    pub concurrency: usize,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct CacheConfig {
    /// Lifetime of a cached actor document.
    pub actor_ttl_secs: u64,
    /// Interval between two expiry sweeps.
    #[validate(range(min = 1, message = "cache.sweep_interval_secs must be at least 1"))]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct RelayConfig {
    /// Largest serialized event (in bytes) accepted from clients.
    pub max_event_bytes: usize,
}
