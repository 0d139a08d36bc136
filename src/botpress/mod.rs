use crate::config::GatewayConfig;
use crate::models::botpress::UpstreamTextMessage;
use crate::server::error::GatewayError;
use axum::http::StatusCode;
use log::{ debug, error, warn };
use reqwest::{ Client as HttpClient, header::{ HeaderValue, AUTHORIZATION, CONTENT_TYPE } };
use serde_json::Value;

/// Forwards one text message to the Botpress conversation API.
#[derive(Clone)]
pub struct BotpressClient {
    http: HttpClient,
    config: GatewayConfig,
}

impl BotpressClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self { http: HttpClient::new(), config }
    }

    /// Secrets are checked before any request leaves the process. A non-success
    /// status is returned as [`GatewayError::Upstream`] with the raw body.
    pub async fn send_text(
        &self,
        conversation_id: &str,
        text: &str
    ) -> Result<Value, GatewayError> {
        let credentials = self.config.credentials()?;
        let endpoint = self.config.messages_endpoint(credentials.bot_id, conversation_id)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", credentials.api_key)).map_err(
            |e| {
                error!("Botpress API key is not a valid header value: {}", e);
                GatewayError::Configuration
            }
        )?;

        debug!("Forwarding message for conversation {} to {}", conversation_id, endpoint);

        let response = self.http
            .post(endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, bearer)
            .json(&UpstreamTextMessage::text(text))
            .send().await
            .map_err(|e| {
                error!("Botpress proxy failure: {}", e);
                GatewayError::UpstreamUnreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            warn!("Botpress answered {} for conversation {}: {}", status, conversation_id, details);
            let status = StatusCode::from_u16(status.as_u16()).unwrap_or(
                StatusCode::BAD_GATEWAY
            );
            return Err(GatewayError::Upstream { status, details });
        }

        response.json::<Value>().await.map_err(|e| {
            error!("Botpress returned an unreadable body: {}", e);
            GatewayError::UpstreamUnreachable(e.to_string())
        })
    }
}
