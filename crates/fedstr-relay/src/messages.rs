//! NIP-01 wire messages.
//!
//! Client → relay: `REQ`, `CLOSE`, `EVENT`. Relay → client: `EVENT`, `EOSE`,
//! `OK`, `CLOSED`, `NOTICE`. Both directions are JSON arrays whose first
//! element names the message.

use fedstr_common::event::{Event, Filter};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Longest subscription id a client may use.
pub const MAX_SUBSCRIPTION_ID_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("could not parse message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

impl MessageError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// A message sent by a relay client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// `["REQ", <subscription_id>, <filter>...]`
    Req {
        subscription_id: String,
        filters: Vec<Filter>,
    },
    /// `["CLOSE", <subscription_id>]`
    Close { subscription_id: String },
    /// `["EVENT", <event>]`
    Event(Box<Event>),
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(mut parts) = value else {
            return Err(MessageError::invalid("message is not a JSON array"));
        };
        if parts.is_empty() {
            return Err(MessageError::invalid("empty message"));
        }

        let rest = parts.split_off(1);
        let label = parts[0].as_str().unwrap_or_default();

        match label {
            "REQ" => {
                let mut rest = rest.into_iter();
                let subscription_id = subscription_id(rest.next())?;
                let filters = rest
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<Filter>, _>>()?;
                Ok(Self::Req {
                    subscription_id,
                    filters,
                })
            }
            "CLOSE" => Ok(Self::Close {
                subscription_id: subscription_id(rest.into_iter().next())?,
            }),
            "EVENT" => {
                let event = rest
                    .into_iter()
                    .next()
                    .ok_or_else(|| MessageError::invalid("EVENT without an event"))?;
                Ok(Self::Event(Box::new(serde_json::from_value(event)?)))
            }
            other => Err(MessageError::Invalid(format!("unknown message type '{other}'"))),
        }
    }
}

fn subscription_id(value: Option<Value>) -> Result<String, MessageError> {
    match value {
        Some(Value::String(id)) if !id.is_empty() && id.len() <= MAX_SUBSCRIPTION_ID_LEN => Ok(id),
        Some(Value::String(_)) => Err(MessageError::invalid("invalid subscription id")),
        _ => Err(MessageError::invalid("missing subscription id")),
    }
}

/// A message sent by the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    Event {
        subscription_id: String,
        event: Box<Event>,
    },
    Eose { subscription_id: String },
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    Closed {
        subscription_id: String,
        message: String,
    },
    Notice(String),
}

impl RelayMessage {
    pub fn to_json(&self) -> String {
        // Serializing strings and events cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for RelayMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Event {
                subscription_id,
                event,
            } => ("EVENT", subscription_id, event).serialize(serializer),
            Self::Eose { subscription_id } => ("EOSE", subscription_id).serialize(serializer),
            Self::Ok {
                event_id,
                accepted,
                message,
            } => ("OK", event_id, accepted, message).serialize(serializer),
            Self::Closed {
                subscription_id,
                message,
            } => ("CLOSED", subscription_id, message).serialize(serializer),
            Self::Notice(message) => ("NOTICE", message).serialize(serializer),
        }
    }
}
