//! # fedstr-relay
//!
//! Nostr relay surface of the bridge. Handles:
//! - WebSocket connections speaking NIP-01 (`REQ`, `CLOSE`, `EVENT`)
//! - Translation of each REQ filter into ActivityPub fetches
//! - The NIP-11 relay information document
//! - A database health probe
//!
//! Nothing is stored: every REQ is answered from live remote fetches and
//! closed with `EOSE`.

pub mod converter;
pub mod messages;
pub mod session;
pub mod translator;

pub use converter::EventConverter;
pub use translator::{ItemOutcome, QueryTranslator, SkipReason};

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use fedstr_common::config::{RelayConfig, ServerConfig};
use fedstr_common::error::FedstrError;
use fedstr_db::Database;
use fedstr_federation::HttpFetcher;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;

/// NIPs this relay answers.
pub const SUPPORTED_NIPS: &[u16] = &[1, 11];

const NOSTR_JSON: &str = "application/nostr+json";

/// Relay state shared by every connection.
pub struct RelayState {
    pub db: Database,
    pub translator: QueryTranslator<HttpFetcher>,
    pub max_event_bytes: usize,
    pub info: RelayInfo,
}

impl RelayState {
    pub fn new(
        db: Database,
        translator: QueryTranslator<HttpFetcher>,
        server: &ServerConfig,
        relay: &RelayConfig,
    ) -> Self {
        Self {
            db,
            translator,
            max_event_bytes: relay.max_event_bytes,
            info: RelayInfo::new(server, relay),
        }
    }
}

/// NIP-11 relay information document.
#[derive(Debug, Clone, Serialize)]
pub struct RelayInfo {
    pub name: String,
    pub description: String,
    pub software: String,
    pub version: String,
    pub supported_nips: Vec<u16>,
    pub limitation: Limitation,
}

#[derive(Debug, Clone, Serialize)]
pub struct Limitation {
    pub max_message_length: usize,
}

impl RelayInfo {
    pub fn new(server: &ServerConfig, relay: &RelayConfig) -> Self {
        Self {
            name: server.name.clone(),
            description: server.description.clone(),
            software: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            supported_nips: SUPPORTED_NIPS.to_vec(),
            limitation: Limitation {
                max_message_length: relay.max_event_bytes,
            },
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Build the relay router.
pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// `GET /`: WebSocket upgrade, NIP-11 document, or a short hint for browsers.
async fn root_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    headers: HeaderMap,
    State(state): State<Arc<RelayState>>,
) -> Response {
    if let Ok(ws) = ws {
        return ws.on_upgrade(move |socket| handle_connection(socket, state));
    }

    let wants_info = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(NOSTR_JSON));

    if wants_info {
        ([(header::CONTENT_TYPE, NOSTR_JSON)], Json(state.info.clone())).into_response()
    } else {
        "Please use a Nostr client to connect.".into_response()
    }
}

async fn health_handler(
    State(state): State<Arc<RelayState>>,
) -> Result<Json<HealthResponse>, FedstrError> {
    if !fedstr_db::health::health_check(&state.db.pool).await {
        return Err(FedstrError::Unavailable {
            message: "database unreachable".into(),
        });
    }

    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Handle a single WebSocket connection.
async fn handle_connection(socket: WebSocket, state: Arc<RelayState>) {
    let (mut sender, mut receiver) = socket.split();

    let connection_id = uuid::Uuid::new_v4();
    tracing::info!(connection = %connection_id, "Relay client connected");

    // Receive loop → sender task.
    let (direct_tx, mut direct_rx) = tokio::sync::mpsc::channel::<String>(256);

    let send_task = tokio::spawn(async move {
        while let Some(text) = direct_rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                let replies = session::handle_text(&state.translator, state.max_event_bytes, &text).await;
                for reply in replies {
                    if direct_tx.send(reply.to_json()).await.is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    drop(direct_tx);
    let _ = send_task.await;
    tracing::info!(connection = %connection_id, "Relay client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fedstr_common::config::FetchConfig;
    use fedstr_common::keys::KeyDeriver;
    use fedstr_db::IdentityMapper;
    use tower::ServiceExt;

    async fn state() -> RelayState {
        let db = fedstr_db::memory_database().await.unwrap();
        let fetcher = HttpFetcher::new(&FetchConfig {
            timeout_secs: 1,
            outbox_limit: 20,
            collection_limit: 200,
            concurrency: 1,
        })
        .unwrap();
        let mapper = IdentityMapper::new(db.pool.clone());
        let converter = EventConverter::new(KeyDeriver::new("0123456789abcdef"), mapper.clone());
        let translator = QueryTranslator::new(mapper, fetcher, converter, 1);

        let server = ServerConfig {
            name: "test relay".into(),
            description: "bridge under test".into(),
            host: "127.0.0.1".into(),
            port: 0,
        };
        RelayState::new(db, translator, &server, &RelayConfig { max_event_bytes: 10_000 })
    }

    fn assert_send<T: Send>(_: T) {}

    // Compile-time check: `on_upgrade` needs the connection future to be `Send`.
    #[allow(dead_code)]
    fn connection_future_is_send(socket: WebSocket, state: Arc<RelayState>) {
        assert_send(handle_connection(socket, state));
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn serves_relay_information_document() {
        let app = build_router(state().await);
        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::ACCEPT, NOSTR_JSON)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], NOSTR_JSON);
        let info = body_json(response).await;
        assert_eq!(info["name"], "test relay");
        assert_eq!(info["supported_nips"], serde_json::json!([1, 11]));
        assert_eq!(info["limitation"]["max_message_length"], 10_000);
    }

    #[tokio::test]
    async fn plain_get_gets_a_hint() {
        let app = build_router(state().await);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reflects_database() {
        let state = state().await;
        let pool = state.db.pool.clone();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");

        pool.close().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "UNAVAILABLE");
    }
}
