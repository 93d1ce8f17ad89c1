use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_token, ErrorBody, Message, MessageType, Thread};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn send(app: &mut Router, request: Request<String>) -> axum::response::Response {
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

async fn create_thread(app: &mut Router, title: &str) -> Thread {
    let body = serde_json::json!({ "title": title }).to_string();
    let resp = send(app, json_request("POST", "/api/threads", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

const MISSING: &str = "00000000-0000-0000-0000-000000000000";

// --- threads ---

#[tokio::test]
async fn list_threads_empty() {
    let resp = app().oneshot(get_request("/api/threads")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let threads: Vec<Thread> = body_json(resp).await;
    assert!(threads.is_empty());
}

#[tokio::test]
async fn create_thread_trims_title() {
    let mut app = app();
    let thread = create_thread(&mut app, "  Holiday  ").await;
    assert_eq!(thread.title, "Holiday");
    assert_eq!(thread.created_at, thread.updated_at);
}

#[tokio::test]
async fn get_thread_not_found() {
    let resp = app()
        .oneshot(get_request(&format!("/api/threads/{MISSING}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Thread not found");
}

#[tokio::test]
async fn get_thread_bad_uuid_returns_400() {
    let resp = app().oneshot(get_request("/api/threads/not-a-uuid")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rename_thread_validates_title() {
    let mut app = app();
    let thread = create_thread(&mut app, "Holiday").await;
    let uri = format!("/api/threads/{}", thread.id);

    let resp = send(&mut app, json_request("PATCH", &uri, r#"{"title":"   "}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let long = serde_json::json!({ "title": "x".repeat(201) }).to_string();
    let resp = send(&mut app, json_request("PATCH", &uri, &long)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Title too long");
}

#[tokio::test]
async fn rename_missing_thread_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/threads/{MISSING}"),
            r#"{"title":"Nope"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- messages ---

#[tokio::test]
async fn posting_a_message_adds_a_bot_reply() {
    let mut app = app();
    let thread = create_thread(&mut app, "Chat").await;
    let uri = format!("/api/threads/{}/messages", thread.id);

    let resp = send(
        &mut app,
        json_request("POST", &uri, r#"{"type":"user","content":" hi there "}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let posted: Message = body_json(resp).await;
    assert_eq!(posted.content, "hi there");
    assert_eq!(posted.kind, MessageType::User);

    let resp = send(&mut app, get_request(&uri)).await;
    let messages: Vec<Message> = body_json(resp).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, posted.id);
    assert_eq!(messages[1].kind, MessageType::Bot);
    assert_eq!(messages[1].content, "Echo: hi there");
}

#[tokio::test]
async fn blank_message_returns_400() {
    let mut app = app();
    let thread = create_thread(&mut app, "Chat").await;
    let resp = send(
        &mut app,
        json_request(
            "POST",
            &format!("/api/threads/{}/messages", thread.id),
            r#"{"type":"user","content":"   "}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn posting_to_missing_thread_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("/api/threads/{MISSING}/messages"),
            r#"{"type":"user","content":"hello"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn editing_messages() {
    let mut app = app();
    let thread = create_thread(&mut app, "Chat").await;
    let uri = format!("/api/threads/{}/messages", thread.id);
    send(&mut app, json_request("POST", &uri, r#"{"type":"user","content":"hello"}"#)).await;
    let messages: Vec<Message> = body_json(send(&mut app, get_request(&uri)).await).await;
    let (user, bot) = (&messages[0], &messages[1]);

    // user message: editable
    let resp = send(
        &mut app,
        json_request("PATCH", &format!("/api/messages/{}", user.id), r#"{"content":"hello!"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let edited: Message = body_json(resp).await;
    assert_eq!(edited.content, "hello!");

    // bot message: forbidden
    let resp = send(
        &mut app,
        json_request("PATCH", &format!("/api/messages/{}", bot.id), r#"{"content":"nope"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Bot messages cannot be edited");

    // unknown message
    let resp = send(
        &mut app,
        json_request("PATCH", &format!("/api/messages/{MISSING}"), r#"{"content":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth ---

#[tokio::test]
async fn token_is_required_when_configured() {
    let mut app = app_with_token(Some("s3cret".to_string()));

    let resp = send(&mut app, get_request("/api/threads")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "Unauthorized");

    let wrong = Request::builder()
        .uri("/api/threads")
        .header(http::header::AUTHORIZATION, "Bearer other")
        .body(String::new())
        .unwrap();
    assert_eq!(send(&mut app, wrong).await.status(), StatusCode::UNAUTHORIZED);

    let right = Request::builder()
        .uri("/api/threads")
        .header(http::header::AUTHORIZATION, "Bearer s3cret")
        .body(String::new())
        .unwrap();
    let resp = send(&mut app, right).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), b"[]");
}
