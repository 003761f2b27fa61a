//! # fedstr-db
//!
//! Database layer for fedstr. A single `sqlx::AnyPool` backs:
//! - **keys**: Nostr pubkey ↔ ActivityPub actor URL (identity records)
//! - **notes**: Nostr event id ↔ ActivityPub note URL
//! - **cache**: transient fetch results with an expiration instant
//!
//! PostgreSQL in production, SQLite for lite mode and tests. The bridge never
//! stores Nostr events.

pub mod expiry;
pub mod health;
pub mod mapper;
pub mod repository;

pub use expiry::{CacheExpirer, ExpiryState};
pub use mapper::IdentityMapper;

use anyhow::Result;
use fedstr_common::config::DatabaseConfig;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

/// Store errors surfaced by repositories and the identity mapper.
pub type DbError = sqlx::Error;

/// Shared database state, cloned into every component that reads the store.
#[derive(Clone)]
pub struct Database {
    pub pool: AnyPool,
}

impl Database {
    /// Connect using the application's database config.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::connect_url(&config.url, config.max_connections, config.min_connections).await
    }

    /// Connect to an explicit URL (`postgres://…`, `sqlite:…`).
    ///
    /// In-memory SQLite databases are per-connection, so callers must pass
    /// `max_connections = 1` for `sqlite::memory:`.
    pub async fn connect_url(url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        sqlx::any::install_default_drivers();

        tracing::info!("Connecting to database...");
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(url)
            .await?;
        tracing::info!("Connected to database");

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations complete");
        Ok(())
    }
}

/// In-memory SQLite database with migrations applied, for tests.
#[doc(hidden)]
pub async fn memory_database() -> Result<Database> {
    let db = Database::connect_url("sqlite::memory:", 1, 1).await?;
    db.migrate().await?;
    Ok(db)
}
