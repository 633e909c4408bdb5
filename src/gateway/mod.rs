pub mod sessions;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Result, SolanaAgentChatError};
use crate::interfaces::agent::AgentFactory;
use crate::keys::session_id;

pub use sessions::SessionStore;

pub const PRIVATE_KEY_HEADER: &str = "x-private-key";

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(factory: Arc<dyn AgentFactory>, config: &Config) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(
                factory,
                config.sessions.max_entries,
                Duration::from_secs(config.sessions.idle_ttl_secs),
            )),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat).fallback(method_not_allowed))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn method_not_allowed() -> Response {
    message_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn private_key_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(PRIVATE_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn internal_error(err: &SolanaAgentChatError) -> Response {
    let message = err.to_string();
    let message = if message.trim().is_empty() {
        "Internal server error".to_string()
    } else {
        message
    };
    message_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

async fn chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(private_key) = private_key_from(&headers) else {
        return message_response(StatusCode::BAD_REQUEST, "Private key is required");
    };

    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "Rejecting unparsable chat body");
            return message_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let session = session_id(&private_key);
    let session = &session[..12];

    let agent = match state.sessions.get_or_initialize(&private_key).await {
        Ok(agent) => agent,
        Err(err) => {
            tracing::error!(session = %session, error = %err, "Chat API error: agent initialization failed");
            return internal_error(&err);
        }
    };

    match agent.process_message(&request.message).await {
        Ok(response) => {
            tracing::debug!(session = %session, len = response.len(), "Chat reply ready");
            (StatusCode::OK, Json(ChatResponse { response })).into_response()
        }
        Err(err) => {
            tracing::error!(session = %session, error = %err, "Chat API error: message processing failed");
            internal_error(&err)
        }
    }
}

pub async fn run(config: &Config, factory: Arc<dyn AgentFactory>) -> Result<()> {
    run_with_shutdown(config, factory, futures::future::pending::<()>()).await
}

pub async fn run_with_shutdown<F>(
    config: &Config,
    factory: Arc<dyn AgentFactory>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(factory, config);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SolanaAgentChatError::Runtime(format!("cannot bind {addr}: {e}")))?;
    tracing::info!(
        addr = %addr,
        network = %config.solana.network,
        "Agent gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| SolanaAgentChatError::Runtime(e.to_string()))?;

    tracing::info!("Agent gateway stopped");
    Ok(())
}
