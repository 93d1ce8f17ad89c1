use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 200;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thread {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Bot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub thread_id: Uuid,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewThread {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateThread {
    pub title: String,
}

#[derive(Deserialize)]
pub struct NewMessage {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: MessageType,
    pub content: String,
}

fn default_kind() -> MessageType {
    MessageType::User
}

#[derive(Deserialize)]
pub struct UpdateMessage {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Threads by id plus every message in insertion (chronological) order.
#[derive(Default)]
pub struct Store {
    threads: HashMap<Uuid, Thread>,
    messages: Vec<Message>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    token: Option<Arc<str>>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

fn reject(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// Router without authentication.
pub fn app() -> Router {
    app_with_token(None)
}

/// Router that requires `Authorization: Bearer <token>` when `token` is set.
pub fn app_with_token(token: Option<String>) -> Router {
    let state = AppState {
        db: Db::default(),
        token: token.map(Arc::from),
    };
    Router::new()
        .route("/api/threads", get(list_threads).post(create_thread))
        .route("/api/threads/{id}", get(get_thread).patch(update_thread))
        .route(
            "/api/threads/{id}/messages",
            get(list_messages).post(create_message),
        )
        .route("/api/messages/{id}", patch(update_message))
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: Option<String>) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, auth = token.is_some(), "mock chat api listening");
    }
    axum::serve(listener, app_with_token(token)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.token {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected.as_ref()) {
            debug!(path = %request.uri().path(), "rejecting unauthenticated request");
            return reject(StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    }
    next.run(request).await
}

fn validate_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(reject(StatusCode::BAD_REQUEST, "Title too long"));
    }
    Ok(title.to_string())
}

fn validate_content(content: &str) -> ApiResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Content is required"));
    }
    Ok(content.to_string())
}

async fn list_threads(State(state): State<AppState>) -> Json<Vec<Thread>> {
    let store = state.db.read().await;
    let mut threads: Vec<Thread> = store.threads.values().cloned().collect();
    threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Json(threads)
}

async fn create_thread(
    State(state): State<AppState>,
    Json(input): Json<NewThread>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let title = validate_title(&input.title)?;
    let now = Utc::now();
    let thread = Thread {
        id: Uuid::new_v4(),
        title,
        created_at: now,
        updated_at: now,
    };
    state.db.write().await.threads.insert(thread.id, thread.clone());
    info!(thread_id = %thread.id, "thread created");
    Ok((StatusCode::CREATED, Json(thread)))
}

async fn get_thread(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Thread>> {
    let store = state.db.read().await;
    store
        .threads
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Thread not found"))
}

async fn update_thread(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateThread>,
) -> ApiResult<Json<Thread>> {
    let mut store = state.db.write().await;
    let thread = store
        .threads
        .get_mut(&id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Thread not found"))?;
    thread.title = validate_title(&input.title)?;
    thread.updated_at = Utc::now();
    info!(thread_id = %id, "thread renamed");
    Ok(Json(thread.clone()))
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Message>>> {
    let store = state.db.read().await;
    if !store.threads.contains_key(&id) {
        return Err(reject(StatusCode::NOT_FOUND, "Thread not found"));
    }
    Ok(Json(
        store
            .messages
            .iter()
            .filter(|m| m.thread_id == id)
            .cloned()
            .collect(),
    ))
}

/// Stores the user's message and answers with a canned bot reply.
async fn create_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewMessage>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    if input.kind != MessageType::User {
        return Err(reject(StatusCode::BAD_REQUEST, "Only user messages can be posted"));
    }
    let content = validate_content(&input.content)?;

    let mut store = state.db.write().await;
    if !store.threads.contains_key(&id) {
        return Err(reject(StatusCode::NOT_FOUND, "Thread not found"));
    }
    let now = Utc::now();
    let message = Message {
        id: Uuid::new_v4(),
        thread_id: id,
        kind: MessageType::User,
        content: content.clone(),
        created_at: now,
    };
    let reply = Message {
        id: Uuid::new_v4(),
        thread_id: id,
        kind: MessageType::Bot,
        content: format!("Echo: {content}"),
        created_at: now,
    };
    store.messages.push(message.clone());
    store.messages.push(reply);
    info!(thread_id = %id, message_id = %message.id, "message posted");
    Ok((StatusCode::CREATED, Json(message)))
}

async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMessage>,
) -> ApiResult<Json<Message>> {
    let mut store = state.db.write().await;
    let message = store
        .messages
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Message not found"))?;
    if message.kind == MessageType::Bot {
        return Err(reject(StatusCode::FORBIDDEN, "Bot messages cannot be edited"));
    }
    message.content = validate_content(&input.content)?;
    info!(message_id = %id, "message edited");
    Ok(Json(message.clone()))
}
