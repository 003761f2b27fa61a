//! Remote fetch error taxonomy.

use thiserror::Error;

/// Why a remote ActivityPub document could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote answered 404/410.
    #[error("'{0}' not found on remote server")]
    NotFound(String),

    /// Network failure, timeout, or any other unexpected HTTP status.
    /// A later identical request may succeed.
    #[error("transient error fetching '{url}': {reason}")]
    Transient { url: String, reason: String },

    /// The document was fetched but lacks what the bridge needs (e.g. `id`).
    #[error("malformed document at '{url}': {reason}")]
    Malformed { url: String, reason: String },
}

impl FetchError {
    pub fn transient(url: &str, reason: impl ToString) -> Self {
        Self::Transient {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(url: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        FetchError::Transient {
            url,
            reason: e.to_string(),
        }
    }
}
