//! ActivityPub documents as the bridge sees them.
//!
//! ActivityPub JSON is loosely shaped: most properties may be a bare URL, an
//! embedded object, or an array of either. Parsing is therefore done over
//! `serde_json::Value` and is lenient: only `id` is required, every other
//! missing or oddly shaped field degrades to an empty value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// Object types converted into text notes.
const NOTE_TYPES: &[&str] = &["Note", "Article", "Page", "Question"];

// ─── Actor ───────────────────────────────────────────────────────────────────

/// A remote actor with its profile fields and resolved follow list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteActor {
    pub url: String,
    /// `name`, falling back to `preferredUsername`.
    pub display_name: String,
    /// `summary`, still in HTML.
    pub bio: String,
    pub avatar_url: String,
    pub outbox_url: Option<String>,
    pub following_url: Option<String>,
    /// Actor URLs this actor follows, in collection order.
    #[serde(default)]
    pub following: Vec<String>,
}

impl RemoteActor {
    /// Parse an actor document. `following` starts empty; the fetcher fills
    /// it from the collection.
    pub fn from_document(fetched_from: &str, doc: &Value) -> Result<Self, FetchError> {
        let url = object_id(doc).ok_or_else(|| FetchError::malformed(fetched_from, "actor has no id"))?;

        let display_name = string_field(doc, "name")
            .filter(|s| !s.is_empty())
            .or_else(|| string_field(doc, "preferredUsername"))
            .unwrap_or_default();

        Ok(Self {
            url,
            display_name,
            bio: string_field(doc, "summary").unwrap_or_default(),
            avatar_url: doc.get("icon").and_then(link_href).unwrap_or_default(),
            outbox_url: doc.get("outbox").and_then(object_id),
            following_url: doc.get("following").and_then(object_id),
            following: Vec::new(),
        })
    }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// A remote content object, converted into a kind-1 event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNote {
    pub url: String,
    pub author_url: String,
    /// HTML body.
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
    pub in_reply_to: Option<String>,
}

impl RemoteNote {
    /// Parse a note document. Fails only when the object has no `id` or no
    /// author at all.
    pub fn from_document(fetched_from: &str, doc: &Value) -> Result<Self, FetchError> {
        let url = object_id(doc).ok_or_else(|| FetchError::malformed(fetched_from, "note has no id"))?;
        let author_url = doc
            .get("attributedTo")
            .and_then(object_id)
            .ok_or_else(|| FetchError::malformed(fetched_from, "note has no attributedTo"))?;

        let body = string_field(doc, "content")
            .or_else(|| {
                doc.get("contentMap")
                    .and_then(Value::as_object)
                    .and_then(|m| m.values().find_map(|v| v.as_str().map(str::to_owned)))
            })
            .unwrap_or_default();

        Ok(Self {
            url,
            author_url,
            body,
            published_at: doc.get("published").and_then(parse_time),
            in_reply_to: doc.get("inReplyTo").and_then(object_id),
        })
    }

    /// Extract the note carried by an outbox item: either a bare note object
    /// or a `Create` activity embedding one. Anything else (boosts, likes,
    /// objects given only by URL) is skipped.
    pub fn from_outbox_item(item: &Value) -> Option<Self> {
        let object = match item.get("type").and_then(Value::as_str) {
            Some("Create") => {
                let mut object = item.get("object")?.clone();
                // Fill a missing attributedTo from the activity's actor.
                if object.get("attributedTo").is_none() {
                    if let (Some(map), Some(actor)) = (object.as_object_mut(), item.get("actor")) {
                        map.insert("attributedTo".into(), actor.clone());
                    }
                }
                object
            }
            Some(_) => item.clone(),
            None => return None,
        };

        if !is_note(&object) {
            return None;
        }
        Self::from_document("outbox item", &object).ok()
    }
}

/// Whether `doc` is an object type the bridge turns into text notes.
pub fn is_note(doc: &Value) -> bool {
    doc.get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| NOTE_TYPES.contains(&t))
}

// ─── Collections ─────────────────────────────────────────────────────────────

/// Items of a collection or collection page, if it carries any inline.
pub fn page_items(doc: &Value) -> Option<&Vec<Value>> {
    doc.get("orderedItems")
        .or_else(|| doc.get("items"))
        .and_then(Value::as_array)
}

// ─── Field helpers ───────────────────────────────────────────────────────────

/// `id` of a value that is either a bare URL string or an object with `id`.
/// Arrays resolve to their first resolvable element.
pub fn object_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_owned),
        Value::Array(items) => items.iter().find_map(object_id),
        _ => None,
    }
}

/// `href`/`url` of a link-like value (`icon`, `image`).
fn link_href(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("href"))
            .and_then(link_href),
        Value::Array(items) => items.iter().find_map(link_href),
        _ => None,
    }
}

fn string_field(doc: &Value, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
