use appauth_api::{AuthApi, AuthConfig, HttpAuthApi};
use appauth_types::{AppConfig, AppData, CollaboratorError, UserId};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Request bodies seen by the fake backend, keyed by route.
#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl Seen {
    fn record(&self, route: &str, body: String) {
        self.requests
            .lock()
            .unwrap()
            .push((route.to_string(), body));
    }

    fn body_for(&self, route: &str) -> String {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| r == route)
            .map(|(_, b)| b.clone())
            .unwrap_or_else(|| panic!("no request recorded for {route}"))
    }
}

async fn authenticate(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.record("authenticate", body.to_string());
    Json(json!({ "appId": body["appId"], "appToken": "A1" }))
}

async fn register(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.record("register", body.to_string());
    Json(json!({ "tokenS": "S1" }))
}

async fn validate_tokens(State(seen): State<Seen>, Json(body): Json<Value>) -> StatusCode {
    seen.record("tokens", body.to_string());
    if body["appToken"] == "A1" && body["symphonyToken"] == "S1" {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn validate_jwt(State(seen): State<Seen>, headers: HeaderMap, body: String) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.record("jwt", format!("{content_type}|{body}"));
    Json(json!(71811853189212u64))
}

async fn start(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn backend() -> (HttpAuthApi, Seen) {
    let seen = Seen::default();
    let router = Router::new()
        .route("/v1/application/authenticate", post(authenticate))
        .route("/v1/application/tokens/validate", post(validate_tokens))
        .route("/v1/application/jwt/validate", post(validate_jwt))
        .route("/application/register", post(register))
        .with_state(seen.clone());
    let url = start(router).await;
    let api = HttpAuthApi::new(&AuthConfig::new(url.clone()), url).unwrap();
    (api, seen)
}

#[tokio::test]
async fn authenticate_app_posts_app_id() {
    let (api, seen) = backend().await;

    let tokens = api.authenticate_app("app1").await.unwrap();
    assert_eq!(tokens.app_token, "A1");
    assert_eq!(tokens.app_id.as_deref(), Some("app1"));

    let body: Value = serde_json::from_str(&seen.body_for("authenticate")).unwrap();
    assert_eq!(body, json!({ "appId": "app1" }));
}

#[tokio::test]
async fn register_application_sends_services() {
    let (api, seen) = backend().await;
    let mut config = AppConfig::new("app1");
    config.exported_services = vec!["app1:nav".to_string()];
    let app_data = AppData {
        app_id: "app1".to_string(),
        token_a: "A1".to_string(),
    };

    let token = api.register_application(&config, &app_data).await.unwrap();
    assert_eq!(token.token_s, "S1");

    let body: Value = serde_json::from_str(&seen.body_for("register")).unwrap();
    assert_eq!(
        body,
        json!({
            "appId": "app1",
            "tokenA": "A1",
            "dependencies": ["extended-user-info"],
            "exportedServices": ["app1:controller", "app1:nav"],
        })
    );
}

#[tokio::test]
async fn validate_tokens_accepts_empty_body() {
    let (api, seen) = backend().await;

    let result = api.validate_tokens("A1", "S1", "app1").await.unwrap();
    assert_eq!(result, Value::Null);

    let body: Value = serde_json::from_str(&seen.body_for("tokens")).unwrap();
    assert_eq!(
        body,
        json!({ "appId": "app1", "appToken": "A1", "symphonyToken": "S1" })
    );
}

#[tokio::test]
async fn validate_tokens_mismatch_is_rejected() {
    let (api, _) = backend().await;

    match api.validate_tokens("A1", "stale", "app1").await {
        Err(CollaboratorError::Rejected { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_jwt_sends_plain_text_and_reads_numeric_id() {
    let (api, seen) = backend().await;

    let validation = api.validate_jwt("J1").await.unwrap();
    assert_eq!(validation.user_id, UserId::new("71811853189212"));
    assert_eq!(seen.body_for("jwt"), "text/plain|J1");
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let router = Router::new().route(
        "/v1/application/authenticate",
        post(|| async { "not json" }),
    );
    let url = start(router).await;
    let api = HttpAuthApi::new(&AuthConfig::new(url.clone()), url).unwrap();

    assert!(matches!(
        api.authenticate_app("app1").await,
        Err(CollaboratorError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn registration_uses_its_own_base_url() {
    let seen = Seen::default();

    // The auth backend is unreachable; only the registration endpoint is live.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let live = {
        let router = Router::new()
            .route("/application/register", post(register))
            .with_state(seen.clone());
        start(router).await
    };
    let api = HttpAuthApi::new(&AuthConfig::new(dead), format!("{live}/")).unwrap();

    let app_data = AppData {
        app_id: "app1".to_string(),
        token_a: "A1".to_string(),
    };
    let token = api
        .register_application(&AppConfig::new("app1"), &app_data)
        .await
        .unwrap();
    assert_eq!(token.token_s, "S1");
    assert!(matches!(
        api.authenticate_app("app1").await,
        Err(CollaboratorError::Transport(_))
    ));
}
