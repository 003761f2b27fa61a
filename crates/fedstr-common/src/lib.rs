//! # fedstr-common
//!
//! Shared Nostr types, configuration, error handling, and key derivation used
//! across all fedstr crates. No I/O beyond config loading lives here.

pub mod config;
pub mod error;
pub mod event;
pub mod keys;
pub mod validation;

pub use event::{DispatchCategory, Event, Filter, Tag};
