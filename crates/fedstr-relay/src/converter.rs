//! Event Converter: turns fetched ActivityPub documents into signed Nostr
//! events.
//!
//! Conversion is deterministic: the author key is derived from the actor URL
//! and signatures carry no randomness, so the same note always becomes the
//! same event. Missing optional fields degrade to empty values. Reverse
//! lookups that miss (or fail) drop the corresponding tag instead of failing
//! the conversion.

use std::sync::LazyLock;

use fedstr_common::event::{kind, Event, Tag, UnsignedEvent};
use fedstr_common::keys::{KeyDeriver, KeyError};
use fedstr_db::IdentityMapper;
use fedstr_federation::{RemoteActor, RemoteNote};
use futures_util::{stream, StreamExt};
use regex::Regex;
use serde_json::json;

/// Concurrent reverse lookups while building a follow list.
const LOOKUP_CONCURRENCY: usize = 8;

static BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>\s*<p[^>]*>").unwrap());
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Clone)]
pub struct EventConverter {
    keys: KeyDeriver,
    mapper: IdentityMapper,
}

impl EventConverter {
    pub fn new(keys: KeyDeriver, mapper: IdentityMapper) -> Self {
        Self { keys, mapper }
    }

    /// Hex pubkey that signs everything converted from `actor_url`.
    pub fn pubkey_for(&self, actor_url: &str) -> Result<String, KeyError> {
        Ok(self.keys.derive(actor_url)?.public_key_hex())
    }

    /// Kind 0 profile metadata. `created_at` is the conversion time, since
    /// actors carry no reliable "last updated" instant.
    pub fn actor_to_metadata_event(&self, actor: &RemoteActor, now: i64) -> Result<Event, KeyError> {
        let content = json!({
            "name": actor.display_name,
            "about": html_to_text(&actor.bio),
            "picture": actor.avatar_url,
        })
        .to_string();

        self.keys.derive(&actor.url)?.sign(UnsignedEvent {
            created_at: now,
            kind: kind::METADATA,
            tags: Vec::new(),
            content,
        })
    }

    /// Kind 3 follow list: one `p` tag per followed actor that maps back to a
    /// Nostr pubkey, in collection order.
    pub async fn actor_to_follow_event(&self, actor: &RemoteActor, now: i64) -> Result<Event, KeyError> {
        let lookups: Vec<_> = actor
            .following
            .iter()
            .cloned()
            .map(|url| self.lookup_pubkey(url))
            .collect();
        let pubkeys: Vec<Option<String>> = stream::iter(lookups)
            .buffered(LOOKUP_CONCURRENCY)
            .collect()
            .await;
        let tags = pubkeys.into_iter().flatten().map(Tag::pubkey).collect();

        self.keys.derive(&actor.url)?.sign(UnsignedEvent {
            created_at: now,
            kind: kind::CONTACTS,
            tags,
            content: String::new(),
        })
    }

    async fn lookup_pubkey(&self, actor_url: String) -> Option<String> {
        match self.mapper.resolve_pubkey(&actor_url).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("Reverse lookup for {} failed: {}", actor_url, e);
                None
            }
        }
    }

    /// Kind 1 text note authored by the note's actor. A reply whose parent
    /// maps to a Nostr event gets a marked `e` tag.
    pub async fn note_to_text_event(&self, note: &RemoteNote) -> Result<Event, KeyError> {
        let mut tags = Vec::new();
        if let Some(parent) = note.in_reply_to.as_deref() {
            match self.mapper.resolve_event_id(parent).await {
                Ok(Some(event_id)) => tags.push(Tag::reply(event_id)),
                Ok(None) => {}
                Err(e) => tracing::debug!("Reverse lookup for {} failed: {}", parent, e),
            }
        }

        self.keys.derive(&note.author_url)?.sign(UnsignedEvent {
            created_at: note.published_at.map(|t| t.timestamp()).unwrap_or(0),
            kind: kind::TEXT_NOTE,
            tags,
            content: html_to_text(&note.body),
        })
    }
}

/// Reduce ActivityPub HTML to plain text: line and paragraph breaks become
/// newlines, every other tag is dropped, and common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let text = PARAGRAPH_REGEX.replace_all(html, "\n\n");
    let text = BREAK_REGEX.replace_all(&text, "\n");
    let text = TAG_REGEX.replace_all(&text, "");

    // `&amp;` last so `&amp;lt;` stays `&lt;`.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_owned()
}
