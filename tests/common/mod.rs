#![allow(dead_code)]

use axum::{
    extract::{ Path, State },
    http::{ header::AUTHORIZATION, HeaderMap, StatusCode },
    routing::post,
    Json,
    Router,
};
use polyedi::botpress::BotpressClient;
use polyedi::config::GatewayConfig;
use polyedi::server::api::{ router, AppState };
use serde_json::Value;
use std::sync::{ Arc, Mutex };
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub bot_id: String,
    pub conversation_id: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

pub struct StubUpstream {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl StubUpstream {
    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }
}

async fn stub_messages(
    State(state): State<StubState>,
    Path((bot_id, conversation_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>
) -> (StatusCode, String) {
    state.seen.lock().unwrap().push(Recorded {
        bot_id,
        conversation_id,
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });
    (state.status, state.body.to_string())
}

/// Botpress stand-in on an ephemeral port answering every message with
/// `status` and `body`.
pub async fn spawn_upstream(status: StatusCode, body: &'static str) -> StubUpstream {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/bots/{bot_id}/conversations/{conversation_id}/messages", post(stub_messages))
        .with_state(StubState { status, body, seen: seen.clone() });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubUpstream { base_url: format!("http://{}", addr), seen }
}

/// A base URL nothing listens on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn gateway_app(bot_id: Option<&str>, api_key: Option<&str>, base_url: &str) -> Router {
    let config = GatewayConfig::new(
        bot_id.map(str::to_owned),
        api_key.map(str::to_owned),
        base_url
    ).unwrap();
    router(AppState { botpress: BotpressClient::new(config) })
}

/// Serves the gateway on an ephemeral port and returns its `/api/botpress` URL.
pub async fn spawn_gateway(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/botpress", addr)
}
