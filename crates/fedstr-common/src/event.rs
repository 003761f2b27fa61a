//! Nostr wire types: events, tags, and REQ filters (NIP-01).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Well-known event kinds produced by the bridge.
pub mod kind {
    /// Profile metadata (`name`, `about`, `picture`).
    pub const METADATA: u16 = 0;
    /// Plain text note.
    pub const TEXT_NOTE: u16 = 1;
    /// Follow list.
    pub const CONTACTS: u16 = 3;
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// A single tag, e.g. `["e", "<id>", "", "reply"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// `["p", <pubkey>]`
    pub fn pubkey(pubkey: impl Into<String>) -> Self {
        Self(vec!["p".into(), pubkey.into()])
    }

    /// `["e", <event id>, "", "reply"]` (NIP-10 marked reply).
    pub fn reply(event_id: impl Into<String>) -> Self {
        Self(vec!["e".into(), event_id.into(), String::new(), "reply".into()])
    }

    /// Tag name (first element), if any.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Tag value (second element), if any.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// A signed Nostr event as sent to and received from relay clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Lowercase hex SHA-256 of the canonical serialization.
    pub id: String,
    /// Author x-only public key, lowercase hex.
    pub pubkey: String,
    /// Unix seconds.
    pub created_at: i64,
    pub kind: u16,
    pub tags: Vec<Tag>,
    pub content: String,
    /// BIP-340 Schnorr signature over `id`, lowercase hex.
    pub sig: String,
}

/// Event fields before an author key has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedEvent {
    pub created_at: i64,
    pub kind: u16,
    pub tags: Vec<Tag>,
    pub content: String,
}

/// Compute the NIP-01 event id: SHA-256 of
/// `[0, pubkey, created_at, kind, tags, content]` serialized as compact JSON.
pub fn compute_id(pubkey: &str, created_at: i64, kind: u16, tags: &[Tag], content: &str) -> [u8; 32] {
    let canonical = serde_json::json!([0, pubkey, created_at, kind, tags, content]);
    // Serializing a `Value` built from strings and integers cannot fail.
    let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
    Sha256::digest(&bytes).into()
}

impl Event {
    /// Length in bytes of this event's compact JSON serialization.
    pub fn serialized_len(&self) -> usize {
        serde_json::to_vec(self).map(|b| b.len()).unwrap_or(usize::MAX)
    }

    /// Whether `id` matches the canonical hash of the other fields.
    pub fn has_valid_id(&self) -> bool {
        let expected = compute_id(&self.pubkey, self.created_at, self.kind, &self.tags, &self.content);
        hex::encode(expected) == self.id
    }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Which field category of a [`Filter`] the query engine answers.
///
/// Categories are checked in a fixed precedence order and the first
/// non-empty one wins; the others are ignored for that filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchCategory {
    /// `ids` is non-empty.
    Ids,
    /// `ids` is empty and `authors` is non-empty.
    Authors,
    /// Only `#e` references are present.
    ReplyTags,
    /// Nothing the bridge can answer.
    Empty,
}

/// A NIP-01 REQ filter. Only the fields the bridge understands are kept;
/// `since`, `until`, `limit` and unknown keys are accepted and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFilter")]
pub struct Filter {
    pub ids: Vec<String>,
    pub authors: Vec<String>,
    pub kinds: Vec<u16>,
    /// Tag queries keyed by tag letter without the `#` (`"e"`, `"p"`, ...).
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Filter {
    /// Values of the `#<name>` tag query, empty if absent.
    pub fn tag_values(&self, name: &str) -> &[String] {
        self.tags.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Select the category that answers this filter.
    pub fn dispatch_category(&self) -> DispatchCategory {
        if !self.ids.is_empty() {
            DispatchCategory::Ids
        } else if !self.authors.is_empty() {
            DispatchCategory::Authors
        } else if !self.tag_values("e").is_empty() {
            DispatchCategory::ReplyTags
        } else {
            DispatchCategory::Empty
        }
    }
}

#[derive(Deserialize)]
struct RawFilter {
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    kinds: Vec<u16>,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

impl From<RawFilter> for Filter {
    fn from(raw: RawFilter) -> Self {
        let tags = raw
            .rest
            .into_iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix('#')?;
                if name.chars().count() != 1 {
                    return None;
                }
                let values = value
                    .as_array()?
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect();
                Some((name.to_owned(), values))
            })
            .collect();

        Self {
            ids: raw.ids,
            authors: raw.authors,
            kinds: raw.kinds,
            tags,
        }
    }
}
