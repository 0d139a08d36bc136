use crate::models::botpress::ErrorBody;
use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use thiserror::Error;

pub const MISSING_PARAMS: &str = "Paramètres manquants";
pub const MISSING_CONFIG: &str = "Configuration Botpress manquante sur le serveur.";
pub const UPSTREAM_ERROR: &str = "Botpress API error";
pub const PROXY_FAILURE: &str = "Échec de la connexion au proxy Botpress.";
pub const METHOD_NOT_ALLOWED: &str = "Méthode non autorisée";

/// Failures of `POST /api/botpress`. None of them is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing text or conversationId")]
    BadRequest,

    #[error("Botpress bot id or API key is not configured")]
    Configuration,

    #[error("Botpress answered {status}")]
    Upstream {
        status: StatusCode,
        details: String,
    },

    /// Detail is for the server log only; the caller sees a generic message.
    #[error("Botpress unreachable: {0}")]
    UpstreamUnreachable(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => *status,
            Self::UpstreamUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            Self::BadRequest => ErrorBody { error: MISSING_PARAMS.into(), details: None },
            Self::Configuration => ErrorBody { error: MISSING_CONFIG.into(), details: None },
            Self::Upstream { details, .. } =>
                ErrorBody { error: UPSTREAM_ERROR.into(), details: Some(details) },
            Self::UpstreamUnreachable(_) => ErrorBody { error: PROXY_FAILURE.into(), details: None },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_propagated() {
        let err = GatewayError::Upstream {
            status: StatusCode::UNAUTHORIZED,
            details: "{\"code\":401}".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"], UPSTREAM_ERROR);
        assert_eq!(body["details"], "{\"code\":401}");
    }

    #[test]
    fn unreachable_hides_transport_detail() {
        let err = GatewayError::UpstreamUnreachable("dns error: no such host".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": PROXY_FAILURE }));
    }
}
