//! Query Translator: answers a Nostr filter by fetching and converting
//! ActivityPub objects on demand.
//!
//! One dispatch category is served per filter (see
//! [`Filter::dispatch_category`]). Every input item (an id or an author)
//! resolves to an [`ItemOutcome`]; skipped items are logged and contribute
//! nothing, so `query` itself never fails. Items are processed with bounded
//! concurrency, but results always come back in input order.
//!
//! Converted events must carry the identifier the client asked for: an
//! author's events are signed by the requested pubkey and a note converts to
//! the requested event id. Mappings that do not round-trip are skipped.

use std::future::Future;

use fedstr_common::event::{kind, DispatchCategory, Event, Filter};
use fedstr_common::keys::KeyError;
use fedstr_db::{DbError, IdentityMapper};
use fedstr_federation::{FetchError, RemoteActor, RemoteFetcher};
use futures_util::{stream, StreamExt};
use thiserror::Error;

use crate::converter::EventConverter;

/// Kinds an author query can produce, in emission order.
const AUTHOR_KINDS: [u16; 3] = [kind::METADATA, kind::TEXT_NOTE, kind::CONTACTS];

/// Why a single id or author produced no events.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("no mapping for '{0}'")]
    Unmapped(String),

    #[error("mapping lookup failed: {0}")]
    Lookup(#[from] DbError),

    #[error("remote fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("conversion failed: {0}")]
    Convert(#[from] KeyError),

    #[error("actor '{actor_url}' does not sign as '{expected}'")]
    KeyMismatch { expected: String, actor_url: String },

    #[error("note converts to '{got}', not '{expected}'")]
    IdMismatch { expected: String, got: String },
}

/// Result of processing one filter item.
#[derive(Debug)]
pub enum ItemOutcome {
    Emitted(Vec<Event>),
    Skipped(SkipReason),
}

impl From<Result<Vec<Event>, SkipReason>> for ItemOutcome {
    fn from(result: Result<Vec<Event>, SkipReason>) -> Self {
        match result {
            Ok(events) => ItemOutcome::Emitted(events),
            Err(reason) => ItemOutcome::Skipped(reason),
        }
    }
}

fn outcome(item: &str, result: Result<Vec<Event>, SkipReason>) -> ItemOutcome {
    let outcome = ItemOutcome::from(result);
    if let ItemOutcome::Skipped(reason) = &outcome {
        tracing::debug!("Skipping '{}': {}", item, reason);
    }
    outcome
}

pub struct QueryTranslator<F> {
    mapper: IdentityMapper,
    fetcher: F,
    converter: EventConverter,
    concurrency: usize,
}

impl<F: RemoteFetcher> QueryTranslator<F> {
    pub fn new(mapper: IdentityMapper, fetcher: F, converter: EventConverter, concurrency: usize) -> Self {
        Self {
            mapper,
            fetcher,
            converter,
            concurrency: concurrency.max(1),
        }
    }

    /// Answer `filter` with converted events, in input order. Never fails;
    /// an unanswerable filter yields an empty result.
    pub async fn query(&self, filter: &Filter) -> Vec<Event> {
        let now = chrono::Utc::now().timestamp();

        let outcomes = match filter.dispatch_category() {
            DispatchCategory::Ids => {
                let jobs: Vec<_> = filter.ids.iter().cloned().map(|id| self.note_item(id)).collect();
                self.each(jobs).await
            }
            DispatchCategory::Authors => {
                let kinds: Vec<u16> = AUTHOR_KINDS
                    .into_iter()
                    .filter(|k| filter.kinds.contains(k))
                    .collect();
                let jobs: Vec<_> = filter
                    .authors
                    .iter()
                    .cloned()
                    .map(|pubkey| self.author_item(pubkey, &kinds, now))
                    .collect();
                self.each(jobs).await
            }
            DispatchCategory::ReplyTags => {
                let jobs: Vec<_> = filter
                    .tag_values("e")
                    .iter()
                    .cloned()
                    .map(|id| self.note_item(id))
                    .collect();
                self.each(jobs).await
            }
            DispatchCategory::Empty => Vec::new(),
        };

        outcomes
            .into_iter()
            .flat_map(|outcome| match outcome {
                ItemOutcome::Emitted(events) => events,
                ItemOutcome::Skipped(_) => Vec::new(),
            })
            .collect()
    }

    /// Drive per-item jobs with bounded fan-out, keeping input order.
    async fn each<Fut>(&self, jobs: Vec<Fut>) -> Vec<ItemOutcome>
    where
        Fut: Future<Output = ItemOutcome>,
    {
        stream::iter(jobs).buffered(self.concurrency).collect().await
    }

    async fn note_item(&self, event_id: String) -> ItemOutcome {
        let result = self.note_events(&event_id).await;
        outcome(&event_id, result)
    }

    async fn author_item(&self, pubkey: String, kinds: &[u16], now: i64) -> ItemOutcome {
        let result = self.author_events(&pubkey, kinds, now).await;
        outcome(&pubkey, result)
    }

    /// event id → note URL → note → kind 1 event.
    async fn note_events(&self, event_id: &str) -> Result<Vec<Event>, SkipReason> {
        let url = self
            .mapper
            .resolve_note(event_id)
            .await?
            .ok_or_else(|| SkipReason::Unmapped(event_id.to_owned()))?;

        let note = self.fetcher.fetch_note(&url).await?;
        let event = self.converter.note_to_text_event(&note).await?;
        if event.id != event_id {
            return Err(SkipReason::IdMismatch {
                expected: event_id.to_owned(),
                got: event.id,
            });
        }
        Ok(vec![event])
    }

    /// pubkey → actor URL → actor → one contribution per requested kind.
    async fn author_events(&self, pubkey: &str, kinds: &[u16], now: i64) -> Result<Vec<Event>, SkipReason> {
        let url = self
            .mapper
            .resolve_actor(pubkey)
            .await?
            .ok_or_else(|| SkipReason::Unmapped(pubkey.to_owned()))?;

        let actor = self.fetcher.fetch_actor(&url).await?;
        if self.converter.pubkey_for(&actor.url)? != pubkey {
            return Err(SkipReason::KeyMismatch {
                expected: pubkey.to_owned(),
                actor_url: actor.url,
            });
        }

        let mut events = Vec::new();
        for &requested in kinds {
            match requested {
                kind::METADATA => events.push(self.converter.actor_to_metadata_event(&actor, now)?),
                kind::TEXT_NOTE => events.extend(self.outbox_events(&actor, pubkey).await?),
                kind::CONTACTS => events.push(self.converter.actor_to_follow_event(&actor, now).await?),
                _ => {}
            }
        }
        Ok(events)
    }

    /// Kind 1 events for an actor's outbox. A missing or failing outbox
    /// contributes nothing without dropping the actor's other kinds. Notes
    /// attributed to other actors are left out.
    async fn outbox_events(&self, actor: &RemoteActor, pubkey: &str) -> Result<Vec<Event>, KeyError> {
        let Some(outbox) = actor.outbox_url.as_deref() else {
            tracing::debug!("Actor '{}' has no outbox", actor.url);
            return Ok(Vec::new());
        };

        let notes = match self.fetcher.fetch_outbox_notes(outbox).await {
            Ok(notes) => notes,
            Err(e) => {
                tracing::debug!("Skipping outbox of '{}': {}", actor.url, e);
                return Ok(Vec::new());
            }
        };

        let mut events = Vec::with_capacity(notes.len());
        for note in &notes {
            let event = self.converter.note_to_text_event(note).await?;
            if event.pubkey != pubkey {
                tracing::debug!("Leaving out '{}' from the outbox of '{}'", note.url, actor.url);
                continue;
            }
            events.push(event);
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::TimeZone;
    use fedstr_common::keys::KeyDeriver;
    use fedstr_federation::RemoteNote;
    use sqlx::AnyPool;

    const SECRET: &str = "0123456789abcdef";
    const ALICE: &str = "https://example.social/users/alice";
    const BOB: &str = "https://example.social/users/bob";

    /// In-memory stand-in for remote servers. Unknown URLs are `NotFound`,
    /// URLs listed in `broken` are `Transient`.
    #[derive(Default)]
    struct FakeFetcher {
        actors: HashMap<String, RemoteActor>,
        notes: HashMap<String, RemoteNote>,
        outboxes: HashMap<String, Vec<RemoteNote>>,
        broken: Vec<String>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn check(&self, url: &str) -> Result<(), FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken.iter().any(|b| b == url) {
                return Err(FetchError::transient(url, "connection reset"));
            }
            Ok(())
        }

        fn with_note(mut self, note: RemoteNote) -> Self {
            self.notes.insert(note.url.clone(), note);
            self
        }
    }

    impl RemoteFetcher for FakeFetcher {
        async fn fetch_actor(&self, url: &str) -> Result<RemoteActor, FetchError> {
            self.check(url)?;
            self.actors
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(url.to_owned()))
        }

        async fn fetch_note(&self, url: &str) -> Result<RemoteNote, FetchError> {
            self.check(url)?;
            self.notes
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(url.to_owned()))
        }

        async fn fetch_outbox_notes(&self, outbox_url: &str) -> Result<Vec<RemoteNote>, FetchError> {
            self.check(outbox_url)?;
            self.outboxes
                .get(outbox_url)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(outbox_url.to_owned()))
        }
    }

    fn actor(url: &str, bio: &str) -> RemoteActor {
        RemoteActor {
            url: url.to_owned(),
            display_name: "Someone".into(),
            bio: bio.to_owned(),
            avatar_url: String::new(),
            outbox_url: Some(format!("{url}/outbox")),
            following_url: None,
            following: vec![BOB.to_owned()],
        }
    }

    fn note(url: &str, author: &str, body: &str, day: u32) -> RemoteNote {
        RemoteNote {
            url: url.to_owned(),
            author_url: author.to_owned(),
            body: body.to_owned(),
            published_at: Some(chrono::Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
            in_reply_to: None,
        }
    }

    /// The pubkey a mapping writer stores for `actor_url`.
    fn key_of(actor_url: &str) -> String {
        KeyDeriver::new(SECRET).derive(actor_url).unwrap().public_key_hex()
    }

    fn hex_id(n: u8) -> String {
        format!("{:02x}", n).repeat(32)
    }

    async fn map_actor(pool: &AnyPool, pubkey: &str, url: &str) {
        sqlx::query("INSERT INTO keys (pubkey, pub_actor_url, created_at) VALUES ($1, $2, $3)")
            .bind(pubkey)
            .bind(url)
            .bind(0_i64)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn map_note(pool: &AnyPool, event_id: &str, url: &str) {
        sqlx::query("INSERT INTO notes (nostr_event_id, pub_note_url) VALUES ($1, $2)")
            .bind(event_id)
            .bind(url)
            .execute(pool)
            .await
            .unwrap();
    }

    /// Store the mapping a writer would produce for `url` and return its id.
    async fn map_fetchable_note(translator: &QueryTranslator<FakeFetcher>, pool: &AnyPool, url: &str) -> String {
        let note = translator.fetcher.notes[url].clone();
        let id = translator.converter.note_to_text_event(&note).await.unwrap().id;
        map_note(pool, &id, url).await;
        id
    }

    async fn translator(fetcher: FakeFetcher) -> (QueryTranslator<FakeFetcher>, AnyPool) {
        let db = fedstr_db::memory_database().await.unwrap();
        let mapper = IdentityMapper::new(db.pool.clone());
        let converter = EventConverter::new(KeyDeriver::new(SECRET), mapper.clone());
        (QueryTranslator::new(mapper, fetcher, converter, 4), db.pool)
    }

    fn filter(json: serde_json::Value) -> Filter {
        serde_json::from_value(json).unwrap()
    }

    fn assert_send<T: Send>(_: T) {}

    #[tokio::test]
    async fn ids_yield_one_event_per_mapped_and_fetchable_id() {
        let fetcher = FakeFetcher::default()
            .with_note(note("https://example.social/notes/1", ALICE, "one", 1))
            .with_note(note("https://example.social/notes/2", ALICE, "two", 2));
        let (translator, pool) = translator(fetcher).await;

        let one = map_fetchable_note(&translator, &pool, "https://example.social/notes/1").await;
        let two = map_fetchable_note(&translator, &pool, "https://example.social/notes/2").await;
        // Mapped, but gone on the remote side.
        map_note(&pool, &hex_id(3), "https://example.social/notes/3").await;

        let events = translator
            .query(&filter(serde_json::json!({
                "ids": [one, hex_id(3), hex_id(4), two]
            })))
            .await;

        let contents: Vec<_> = events.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(events[0].id, one);
        assert_eq!(events[1].id, two);
        assert!(events.iter().all(|e| e.kind == kind::TEXT_NOTE));
    }

    #[tokio::test]
    async fn note_converting_to_another_id_is_skipped() {
        let fetcher = FakeFetcher::default().with_note(note("https://example.social/notes/1", ALICE, "one", 1));
        let (translator, pool) = translator(fetcher).await;
        map_note(&pool, &hex_id(1), "https://example.social/notes/1").await;

        let result = translator.note_events(&hex_id(1)).await;
        assert!(matches!(result, Err(SkipReason::IdMismatch { expected, .. }) if expected == hex_id(1)));
        assert!(translator
            .query(&filter(serde_json::json!({"ids": [hex_id(1)]})))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn ids_take_precedence_over_authors_and_tags() {
        let mut fetcher = FakeFetcher::default()
            .with_note(note("https://example.social/notes/1", ALICE, "one", 1))
            .with_note(note("https://example.social/notes/9", ALICE, "tagged", 9));
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        let (translator, pool) = translator(fetcher).await;

        map_actor(&pool, &key_of(ALICE), ALICE).await;
        let one = map_fetchable_note(&translator, &pool, "https://example.social/notes/1").await;
        let tagged = map_fetchable_note(&translator, &pool, "https://example.social/notes/9").await;

        let events = translator
            .query(&filter(serde_json::json!({
                "ids": [one],
                "authors": [key_of(ALICE)],
                "kinds": [0, 1, 3],
                "#e": [tagged]
            })))
            .await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].content, "one");

        // An id that resolves to nothing still suppresses the other fields.
        let events = translator
            .query(&filter(serde_json::json!({
                "ids": [hex_id(77)],
                "authors": [key_of(ALICE)],
                "kinds": [0]
            })))
            .await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn authors_take_precedence_over_reply_tags() {
        let mut fetcher = FakeFetcher::default().with_note(note("https://example.social/notes/9", BOB, "tagged", 9));
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        let (translator, pool) = translator(fetcher).await;

        map_actor(&pool, &key_of(ALICE), ALICE).await;
        let tagged = map_fetchable_note(&translator, &pool, "https://example.social/notes/9").await;

        let events = translator
            .query(&filter(serde_json::json!({
                "authors": [key_of(ALICE)],
                "kinds": [0],
                "#e": [tagged]
            })))
            .await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, kind::METADATA);
        assert_eq!(events[0].pubkey, key_of(ALICE));
    }

    #[tokio::test]
    async fn metadata_for_resolvable_author_only() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "<p>hello</p>"));
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &key_of(ALICE), ALICE).await;

        let events = translator
            .query(&filter(serde_json::json!({"authors": [key_of(ALICE)], "kinds": [0]})))
            .await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, kind::METADATA);
        assert_eq!(events[0].pubkey, key_of(ALICE));
        let content: serde_json::Value = serde_json::from_str(&events[0].content).unwrap();
        assert_eq!(content["about"], "hello");

        let events = translator
            .query(&filter(serde_json::json!({"authors": [key_of(BOB)], "kinds": [0]})))
            .await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn author_mapped_to_foreign_actor_is_skipped() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &hex_id(10), ALICE).await;

        let result = translator.author_events(&hex_id(10), &[kind::METADATA], 0).await;
        assert!(matches!(
            result,
            Err(SkipReason::KeyMismatch { expected, actor_url }) if expected == hex_id(10) && actor_url == ALICE
        ));
        assert!(translator
            .query(&filter(serde_json::json!({"authors": [hex_id(10)], "kinds": [0]})))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn metadata_then_outbox_notes_in_order() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        fetcher.outboxes.insert(
            format!("{ALICE}/outbox"),
            vec![
                note("https://example.social/notes/n1", ALICE, "N1", 2),
                note("https://example.social/notes/boost", BOB, "not alice", 3),
                note("https://example.social/notes/n2", ALICE, "N2", 1),
            ],
        );
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &key_of(ALICE), ALICE).await;

        let events = translator
            .query(&filter(serde_json::json!({"authors": [key_of(ALICE)], "kinds": [1, 0]})))
            .await;

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![kind::METADATA, kind::TEXT_NOTE, kind::TEXT_NOTE]);
        assert!(events[0].content.contains("hello"));
        assert_eq!(events[1].content, "N1");
        assert_eq!(events[2].content, "N2");
        assert!(events.iter().all(|e| e.pubkey == key_of(ALICE)));
    }

    #[tokio::test]
    async fn kinds_emitted_in_fixed_order_once() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        fetcher.outboxes.insert(
            format!("{ALICE}/outbox"),
            vec![note("https://example.social/notes/n1", ALICE, "N1", 1)],
        );
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &key_of(ALICE), ALICE).await;
        map_actor(&pool, &key_of(BOB), BOB).await;

        let events = translator
            .query(&filter(serde_json::json!({"authors": [key_of(ALICE)], "kinds": [3, 1, 0, 3, 7]})))
            .await;

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![kind::METADATA, kind::TEXT_NOTE, kind::CONTACTS]);
        assert_eq!(events[2].tags[0].value(), Some(key_of(BOB).as_str()));
    }

    #[tokio::test]
    async fn failing_author_is_skipped_alone() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(BOB.into(), actor(BOB, "bob here"));
        fetcher.broken.push(ALICE.into());
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &key_of(ALICE), ALICE).await;
        map_actor(&pool, &key_of(BOB), BOB).await;

        let events = translator
            .query(&filter(serde_json::json!({
                "authors": [key_of(ALICE), hex_id(99), key_of(BOB)],
                "kinds": [0]
            })))
            .await;

        assert_eq!(events.len(), 1);
        assert!(events[0].content.contains("bob here"));
        assert_eq!(events[0].pubkey, key_of(BOB));
    }

    #[tokio::test]
    async fn outbox_failure_keeps_other_kinds() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        fetcher.broken.push(format!("{ALICE}/outbox"));
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &key_of(ALICE), ALICE).await;

        let events = translator
            .query(&filter(serde_json::json!({"authors": [key_of(ALICE)], "kinds": [1, 0]})))
            .await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, kind::METADATA);
    }

    #[tokio::test]
    async fn reply_tags_resolve_like_ids() {
        let fetcher = FakeFetcher::default().with_note(note("https://example.social/notes/1", ALICE, "parent", 1));
        let (translator, pool) = translator(fetcher).await;
        let parent = map_fetchable_note(&translator, &pool, "https://example.social/notes/1").await;

        let events = translator
            .query(&filter(serde_json::json!({"#e": [parent, hex_id(2)]})))
            .await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].content, "parent");
    }

    #[tokio::test]
    async fn empty_filter_fetches_nothing() {
        let (translator, _pool) = translator(FakeFetcher::default()).await;

        let events = translator
            .query(&filter(serde_json::json!({"kinds": [1], "#p": [hex_id(1)]})))
            .await;
        assert!(events.is_empty());
        assert_eq!(translator.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unmapped_items_never_reach_the_network() {
        let (translator, _pool) = translator(FakeFetcher::default()).await;

        let events = translator
            .query(&filter(serde_json::json!({"ids": [hex_id(1)]})))
            .await;
        assert!(events.is_empty());
        assert_eq!(translator.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreachable_store_skips_every_item() {
        let fetcher = FakeFetcher::default().with_note(note("https://example.social/notes/1", ALICE, "one", 1));
        let (translator, pool) = translator(fetcher).await;
        let one = map_fetchable_note(&translator, &pool, "https://example.social/notes/1").await;
        pool.close().await;

        assert!(matches!(translator.note_events(&one).await, Err(SkipReason::Lookup(_))));
        let events = translator
            .query(&filter(serde_json::json!({"ids": [one], "authors": [key_of(ALICE)]})))
            .await;
        assert!(events.is_empty());
        assert_eq!(translator.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn query_runs_on_a_spawned_task() {
        let mut fetcher = FakeFetcher::default();
        fetcher.actors.insert(ALICE.into(), actor(ALICE, "hello"));
        let (translator, pool) = translator(fetcher).await;
        map_actor(&pool, &key_of(ALICE), ALICE).await;
        let translator = Arc::new(translator);

        let f = filter(serde_json::json!({"authors": [key_of(ALICE)], "kinds": [0, 3]}));
        assert_send(translator.query(&f));

        let spawned = Arc::clone(&translator);
        let events = tokio::spawn(async move { spawned.query(&f).await }).await.unwrap();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![kind::METADATA, kind::CONTACTS]);
    }

    #[test]
    fn outcome_from_result() {
        assert!(matches!(
            ItemOutcome::from(Ok(Vec::new())),
            ItemOutcome::Emitted(events) if events.is_empty()
        ));
        assert!(matches!(
            ItemOutcome::from(Err(SkipReason::Unmapped("x".into()))),
            ItemOutcome::Skipped(SkipReason::Unmapped(_))
        ));
        assert!(matches!(
            ItemOutcome::from(Err(SkipReason::from(KeyError::Signing("bad nonce".into())))),
            ItemOutcome::Skipped(SkipReason::Convert(KeyError::Signing(_)))
        ));
    }
}
