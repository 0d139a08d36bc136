use serde::{ Serialize, Deserialize };

/// Body accepted by `POST /api/botpress` and sent by the conversation client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub text: String,
    pub conversation_id: String,
}

/// Inbound form of [`ProxyRequest`]; both fields may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingProxyRequest {
    pub text: Option<String>,
    pub conversation_id: Option<String>,
}

impl IncomingProxyRequest {
    pub fn validate(self) -> Option<ProxyRequest> {
        let text = self.text.filter(|t| !t.is_empty())?;
        let conversation_id = self.conversation_id.filter(|c| !c.is_empty())?;
        Some(ProxyRequest { text, conversation_id })
    }
}

/// Message body posted to the Botpress conversation endpoint.
#[derive(Debug, Serialize)]
pub struct UpstreamTextMessage<'a> {
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub text: &'a str,
}

impl<'a> UpstreamTextMessage<'a> {
    pub fn text(text: &'a str) -> Self {
        Self { message_type: "text", text }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
