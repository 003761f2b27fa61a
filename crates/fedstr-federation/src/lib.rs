//! # fedstr-federation
//!
//! ActivityPub side of the bridge: fetching actors, notes, and outboxes from
//! remote servers over HTTP.
//!
//! ## Key concepts
//!
//! - **Remote fetcher** ([`RemoteFetcher`]): the seam the query engine
//!   depends on. Every fetch is bounded by the fetcher's own timeout; there is
//!   no retry.
//! - **HTTP fetcher** (`client.rs`): the production implementation, using
//!   `reqwest` with ActivityPub content negotiation and an actor cache in the
//!   `cache` table.
//! - **Types** (`types.rs`): lenient parsing of actor/note/collection JSON.

pub mod client;
pub mod error;
pub mod types;

use std::future::Future;

pub use client::HttpFetcher;
pub use error::FetchError;
pub use types::{RemoteActor, RemoteNote};

/// Source of remote ActivityPub documents.
pub trait RemoteFetcher: Send + Sync {
    /// Fetch an actor, including its following list.
    fn fetch_actor(&self, url: &str) -> impl Future<Output = Result<RemoteActor, FetchError>> + Send;

    /// Fetch a single note.
    fn fetch_note(&self, url: &str) -> impl Future<Output = Result<RemoteNote, FetchError>> + Send;

    /// Fetch the notes of an outbox, newest first as the remote orders them.
    /// The result is bounded; pagination is internal to the fetcher.
    fn fetch_outbox_notes(
        &self,
        outbox_url: &str,
    ) -> impl Future<Output = Result<Vec<RemoteNote>, FetchError>> + Send;
}
