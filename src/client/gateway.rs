use crate::models::botpress::ProxyRequest;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use thiserror::Error;

use super::store::StoreError;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("gateway answered {0}")]
    Status(u16),

    #[error("gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway reply is not JSON: {0}")]
    Decode(String),

    #[error("conversation id unavailable: {0}")]
    Identity(#[from] StoreError),
}

/// Outbound half of the conversation client.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn post_message(&self, request: &ProxyRequest) -> Result<Value, SendError>;
}

pub struct HttpGateway {
    http: HttpClient,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { http: HttpClient::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn post_message(&self, request: &ProxyRequest) -> Result<Value, SendError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SendError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| SendError::Decode(e.to_string()))
    }
}
