//! Deterministic Nostr keys for bridged ActivityPub actors.
//!
//! Every remote actor gets a secp256k1 key derived as
//! `HMAC-SHA256(bridge secret, actor URL)`. The same actor therefore always
//! maps to the same pubkey, and events converted from the same remote
//! document are byte-identical: signatures use BIP-340 with all-zero
//! auxiliary randomness.

use hmac::{Hmac, Mac};
use k256::schnorr::{Signature, SigningKey, VerifyingKey};
use sha2::Sha256;
use thiserror::Error;

use crate::event::{compute_id, Event, UnsignedEvent};

type HmacSha256 = Hmac<Sha256>;

const ZERO_AUX_RAND: [u8; 32] = [0u8; 32];

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("derived key material for '{0}' is not a valid secp256k1 scalar")]
    InvalidScalar(String),

    #[error("failed to sign event: {0}")]
    Signing(String),
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Derives actor keys from the configured bridge secret.
#[derive(Clone)]
pub struct KeyDeriver {
    secret: Vec<u8>,
}

impl KeyDeriver {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Derive the signing key that represents `actor_url` on Nostr.
    pub fn derive(&self, actor_url: &str) -> Result<ActorKey, KeyError> {
        // HMAC accepts keys of any length.
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| KeyError::InvalidScalar(e.to_string()))?;
        mac.update(actor_url.as_bytes());
        let seed = mac.finalize().into_bytes();

        let signing = SigningKey::from_bytes(&seed)
            .map_err(|_| KeyError::InvalidScalar(actor_url.to_owned()))?;
        Ok(ActorKey { signing })
    }
}

impl std::fmt::Debug for KeyDeriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDeriver").finish_non_exhaustive()
    }
}

// ─── Actor key ───────────────────────────────────────────────────────────────

/// The Nostr identity of one bridged actor.
pub struct ActorKey {
    signing: SigningKey,
}

impl ActorKey {
    /// x-only public key, lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing.verifying_key().to_bytes())
    }

    /// Compute the id of `unsigned` under this key and sign it.
    pub fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, KeyError> {
        let pubkey = self.public_key_hex();
        let id = compute_id(
            &pubkey,
            unsigned.created_at,
            unsigned.kind,
            &unsigned.tags,
            &unsigned.content,
        );
        let sig = self
            .signing
            .sign_raw(&id, &ZERO_AUX_RAND)
            .map_err(|e| KeyError::Signing(e.to_string()))?;

        Ok(Event {
            id: hex::encode(id),
            pubkey,
            created_at: unsigned.created_at,
            kind: unsigned.kind,
            tags: unsigned.tags,
            content: unsigned.content,
            sig: hex::encode(sig.to_bytes()),
        })
    }
}

/// Check an event's id and Schnorr signature.
pub fn verify_event(event: &Event) -> bool {
    if !event.has_valid_id() {
        return false;
    }
    let (Ok(pubkey), Ok(id), Ok(sig)) = (
        hex::decode(&event.pubkey),
        hex::decode(&event.id),
        hex::decode(&event.sig),
    ) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&pubkey) else {
        return false;
    };
    let Ok(sig) = Signature::try_from(sig.as_slice()) else {
        return false;
    };
    key.verify_raw(&id, &sig).is_ok()
}
