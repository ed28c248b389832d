use crate::agent::ChatAgent;
use crate::error::ApiError;
use crate::models::chat::{ ChatRequest, ChatResponse };
use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    routing::post,
    Json,
    Router,
};
use log::{ info, warn };
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    agent: ChatAgent,
}

/// `POST /chat` relays to the agent; every other path is served from `static_dir`.
pub fn build_router(agent: ChatAgent, static_dir: &str) -> Router {
    Router::new()
        .route("/chat", post(chat_handler).fallback(method_not_allowed))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(AppState { agent })
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    // Only the first JSON value is decoded; anything after it is ignored.
    let mut values = serde_json::Deserializer::from_slice(&body).into_iter::<ChatRequest>();
    let req = match values.next() {
        Some(Ok(req)) => req,
        Some(Err(e)) => {
            warn!("Rejected chat request: invalid JSON ({})", e);
            return Err(ApiError::InvalidJson);
        }
        None => {
            warn!("Rejected chat request: empty body");
            return Err(ApiError::InvalidJson);
        }
    };

    if req.user_id.is_empty() || req.message.is_empty() {
        warn!("Rejected chat request: user_id or message missing");
        return Err(ApiError::MissingFields);
    }

    info!("Chat request from '{}'", req.user_id);
    let reply = state.agent.process_message(&req.user_id, &req.message).await?;

    Ok(Json(ChatResponse { reply }))
}

async fn method_not_allowed(method: Method) -> ApiError {
    warn!("Rejected {} /chat", method);
    ApiError::MethodNotAllowed
}
