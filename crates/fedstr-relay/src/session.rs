//! Per-connection message handling.
//!
//! The bridge keeps no live subscriptions: a `REQ` is answered completely
//! and closed with `EOSE`, and `CLOSE` is acknowledged without any state to
//! tear down.

use fedstr_common::validation::admit_event;
use fedstr_federation::RemoteFetcher;

use crate::messages::{ClientMessage, RelayMessage};
use crate::translator::QueryTranslator;

/// Answer one text frame from a client.
pub async fn handle_text<F: RemoteFetcher>(
    translator: &QueryTranslator<F>,
    max_event_bytes: usize,
    text: &str,
) -> Vec<RelayMessage> {
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Rejected client message: {}", e);
            return vec![RelayMessage::Notice(format!("error: {e}"))];
        }
    };

    match message {
        ClientMessage::Req {
            subscription_id,
            filters,
        } => {
            let mut replies = Vec::new();
            for filter in &filters {
                for event in translator.query(filter).await {
                    replies.push(RelayMessage::Event {
                        subscription_id: subscription_id.clone(),
                        event: Box::new(event),
                    });
                }
            }
            tracing::debug!(
                subscription = %subscription_id,
                events = replies.len(),
                "REQ answered"
            );
            replies.push(RelayMessage::Eose { subscription_id });
            replies
        }
        ClientMessage::Close { subscription_id } => vec![RelayMessage::Closed {
            subscription_id,
            message: String::new(),
        }],
        ClientMessage::Event(event) => {
            let accepted = admit_event(&event, max_event_bytes);
            vec![RelayMessage::Ok {
                event_id: event.id.clone(),
                accepted,
                message: if accepted {
                    String::new()
                } else {
                    "invalid: event too large".into()
                },
            }]
        }
    }
}
