//! Identity Mapper: bidirectional lookups between Nostr identifiers and
//! ActivityPub URLs.
//!
//! A miss is a normal outcome (`Ok(None)`), not an error. Store failures are
//! returned as-is; the query engine treats both as a skip.
//!
//! Rows are written by the bridge's other half. A `keys` row must store the
//! pubkey `KeyDeriver` derives from its actor URL, and a `notes` row the id
//! the note converts to; rows that do not round-trip are never served.

use sqlx::AnyPool;

use crate::repository::mappings;

#[derive(Clone)]
pub struct IdentityMapper {
    pool: AnyPool,
}

impl IdentityMapper {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// pubkey → actor URL.
    pub async fn resolve_actor(&self, pubkey: &str) -> Result<Option<String>, sqlx::Error> {
        mappings::find_actor_url(&self.pool, pubkey).await
    }

    /// event id → note URL.
    pub async fn resolve_note(&self, event_id: &str) -> Result<Option<String>, sqlx::Error> {
        mappings::find_note_url(&self.pool, event_id).await
    }

    /// actor URL → pubkey.
    pub async fn resolve_pubkey(&self, actor_url: &str) -> Result<Option<String>, sqlx::Error> {
        mappings::find_pubkey(&self.pool, actor_url).await
    }

    /// note URL → event id.
    pub async fn resolve_event_id(&self, note_url: &str) -> Result<Option<String>, sqlx::Error> {
        mappings::find_event_id(&self.pool, note_url).await
    }
}
