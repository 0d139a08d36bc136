use crate::botpress::BotpressClient;
use crate::models::botpress::{ ErrorBody, IncomingProxyRequest };
use crate::server::error::{ GatewayError, METHOD_NOT_ALLOWED };
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json,
    Router,
};
use log::{ debug, error, info };
use serde_json::Value;
use std::error::Error;
use std::net::SocketAddr;
use tower_http::cors::{ Any, CorsLayer };

pub const BOTPRESS_ROUTE: &str = "/api/botpress";

#[derive(Clone)]
pub struct AppState {
    pub botpress: BotpressClient,
}

pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route(BOTPRESS_ROUTE, post(botpress_handler).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    addr: SocketAddr,
    state: AppState,
    tls: Option<TlsPaths>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(state);

    if let Some(tls) = tls {
        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            tls.cert_path,
            tls.key_path
        );
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            &tls.cert_path,
            &tls.key_path
        ).await?;

        info!("Botpress proxy listening on https://{}{}", addr, BOTPRESS_ROUTE);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;

        info!("Botpress proxy listening on http://{}{}", addr, BOTPRESS_ROUTE);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn botpress_handler(
    State(state): State<AppState>,
    body: Bytes
) -> Result<Json<Value>, GatewayError> {
    let request = serde_json
        ::from_slice::<IncomingProxyRequest>(&body)
        .ok()
        .and_then(IncomingProxyRequest::validate)
        .ok_or(GatewayError::BadRequest)?;

    debug!("Proxy request for conversation {}", request.conversation_id);

    let reply = state.botpress.send_text(&request.conversation_id, &request.text).await?;
    Ok(Json(reply))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody { error: METHOD_NOT_ALLOWED.into(), details: None }),
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
