//! Mapping repository: point lookups between Nostr identifiers and
//! ActivityPub URLs.
//!
//! Rows are written by the publishing/inbox pipeline the first time a local
//! identity or note is exposed to the fediverse. This module only reads.

use sqlx::AnyPool;

/// Actor URL mapped to a Nostr pubkey.
pub async fn find_actor_url(pool: &AnyPool, pubkey: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT pub_actor_url FROM keys WHERE pubkey = $1")
        .bind(pubkey)
        .fetch_optional(pool)
        .await
}

/// Nostr pubkey mapped to an actor URL.
pub async fn find_pubkey(pool: &AnyPool, actor_url: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT pubkey FROM keys WHERE pub_actor_url = $1")
        .bind(actor_url)
        .fetch_optional(pool)
        .await
}

/// Note URL mapped to a Nostr event id.
pub async fn find_note_url(pool: &AnyPool, event_id: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT pub_note_url FROM notes WHERE nostr_event_id = $1")
        .bind(event_id)
        .fetch_optional(pool)
        .await
}

/// Nostr event id mapped to a note URL.
pub async fn find_event_id(pool: &AnyPool, note_url: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT nostr_event_id FROM notes WHERE pub_note_url = $1")
        .bind(note_url)
        .fetch_optional(pool)
        .await
}
