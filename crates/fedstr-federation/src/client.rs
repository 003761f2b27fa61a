//! HTTP implementation of [`RemoteFetcher`].
//!
//! The [`HttpFetcher`] performs all outbound ActivityPub reads. Requests ask
//! for `application/activity+json`, are bounded by the configured timeout,
//! and are never retried.
//!
//! # Usage
//!
//! ```rust,no_run
//! use fedstr_common::config::FetchConfig;
//! use fedstr_federation::{HttpFetcher, RemoteFetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FetchConfig { timeout_secs: 10, outbox_limit: 20, collection_limit: 200, concurrency: 4 };
//!     let fetcher = HttpFetcher::new(&config).unwrap();
//!     let actor = fetcher.fetch_actor("https://example.social/users/alice").await.unwrap();
//!     println!("{}", actor.display_name);
//! }
//! ```

use std::time::Duration;

use fedstr_common::config::FetchConfig;
use fedstr_db::repository::cache;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use sqlx::AnyPool;
use tracing::debug;

use crate::{
    error::FetchError,
    types::{is_note, object_id, page_items, RemoteActor, RemoteNote},
    RemoteFetcher,
};

const ACTIVITY_JSON: &str =
    r#"application/activity+json, application/ld+json; profile="https://www.w3.org/ns/activitystreams""#;

/// Upper bound on collection pages walked for a single list.
const MAX_PAGES: usize = 5;

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for ActivityPub object fetches.
pub struct HttpFetcher {
    http: Client,
    outbox_limit: usize,
    collection_limit: usize,
    actor_cache: Option<ActorCache>,
}

struct ActorCache {
    pool: AnyPool,
    ttl_secs: i64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("fedstr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::transient("", e))?;

        Ok(Self {
            http,
            outbox_limit: config.outbox_limit,
            collection_limit: config.collection_limit,
            actor_cache: None,
        })
    }

    /// Cache fetched actors (including their resolved follow list) in the
    /// `cache` table for `ttl`.
    pub fn with_actor_cache(mut self, pool: AnyPool, ttl: Duration) -> Self {
        self.actor_cache = Some(ActorCache {
            pool,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        });
        self
    }

    // ── Documents ────────────────────────────────────────────────────────────

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("ActivityPub GET {}", url);
        let resp = self.http.get(url).header(ACCEPT, ACTIVITY_JSON).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(FetchError::NotFound(url.to_owned()));
        }
        if !status.is_success() {
            return Err(FetchError::transient(url, format!("HTTP {status}")));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::malformed(url, e))
    }

    // ── Collections ──────────────────────────────────────────────────────────

    /// Items of an (ordered) collection, following `first` and `next` links,
    /// capped at `limit` items and [`MAX_PAGES`] pages.
    async fn collection_items(&self, url: &str, limit: usize) -> Result<Vec<Value>, FetchError> {
        let root = self.get_json(url).await?;

        let mut page = if page_items(&root).is_some() {
            Some((url.to_owned(), root))
        } else {
            match root.get("first") {
                Some(Value::String(first)) => {
                    let first = absolute(url, first);
                    let doc = self.get_json(&first).await?;
                    Some((first, doc))
                }
                Some(embedded @ Value::Object(_)) => Some((url.to_owned(), embedded.clone())),
                _ => None,
            }
        };

        let mut items = Vec::new();
        let mut pages = 0;
        while let Some((page_url, doc)) = page.take() {
            pages += 1;
            if let Some(found) = page_items(&doc) {
                items.extend(found.iter().cloned());
            }
            if items.len() >= limit || pages >= MAX_PAGES {
                break;
            }
            if let Some(next) = doc.get("next").and_then(object_id) {
                let next = absolute(&page_url, &next);
                match self.get_json(&next).await {
                    Ok(doc) => page = Some((next, doc)),
                    // Keep what the earlier pages gave us.
                    Err(e) => debug!("Stopping at collection page {}: {}", next, e),
                }
            }
        }

        items.truncate(limit);
        Ok(items)
    }

    /// Actor URLs listed in a following collection. A collection that cannot
    /// be read (hidden, missing, failing) yields an empty list.
    async fn actor_list(&self, url: Option<&str>) -> Vec<String> {
        let Some(url) = url else {
            return Vec::new();
        };
        match self.collection_items(url, self.collection_limit).await {
            Ok(items) => items.iter().filter_map(object_id).collect(),
            Err(e) => {
                debug!("Collection {} unavailable: {}", url, e);
                Vec::new()
            }
        }
    }

    // ── Actor cache ──────────────────────────────────────────────────────────

    async fn cached_actor(&self, url: &str) -> Option<RemoteActor> {
        let cache = self.actor_cache.as_ref()?;
        let now = chrono::Utc::now().timestamp();
        match cache::get(&cache.pool, &actor_cache_key(url), now).await {
            Ok(Some(json)) => serde_json::from_str(&json).ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("Actor cache read failed for {}: {}", url, e);
                None
            }
        }
    }

    async fn store_actor(&self, url: &str, actor: &RemoteActor) {
        let Some(cache) = self.actor_cache.as_ref() else {
            return;
        };
        let Ok(json) = serde_json::to_string(actor) else {
            return;
        };
        let expiration = chrono::Utc::now().timestamp().saturating_add(cache.ttl_secs);
        if let Err(e) = cache::put(&cache.pool, &actor_cache_key(url), &json, expiration).await {
            debug!("Actor cache write failed for {}: {}", url, e);
        }
    }
}

impl RemoteFetcher for HttpFetcher {
    async fn fetch_actor(&self, url: &str) -> Result<RemoteActor, FetchError> {
        if let Some(actor) = self.cached_actor(url).await {
            debug!("Actor cache hit: {}", url);
            return Ok(actor);
        }

        let doc = self.get_json(url).await?;
        let mut actor = RemoteActor::from_document(url, &doc)?;

        actor.following = self.actor_list(actor.following_url.as_deref()).await;

        self.store_actor(url, &actor).await;
        Ok(actor)
    }

    async fn fetch_note(&self, url: &str) -> Result<RemoteNote, FetchError> {
        let doc = self.get_json(url).await?;
        if doc.get("type").is_some() && !is_note(&doc) {
            return Err(FetchError::malformed(url, "object is not a note"));
        }
        RemoteNote::from_document(url, &doc)
    }

    async fn fetch_outbox_notes(&self, outbox_url: &str) -> Result<Vec<RemoteNote>, FetchError> {
        let items = self.collection_items(outbox_url, self.outbox_limit).await?;
        Ok(items.iter().filter_map(RemoteNote::from_outbox_item).collect())
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn actor_cache_key(url: &str) -> String {
    format!("actor:{url}")
}

/// Resolve a possibly relative collection link against the page it came from.
fn absolute(base: &str, reference: &str) -> String {
    url::Url::parse(base)
        .and_then(|b| b.join(reference))
        .map(String::from)
        .unwrap_or_else(|_| reference.to_owned())
}
