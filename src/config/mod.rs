use crate::cli::Args;
use crate::server::error::GatewayError;
use std::error::Error;
use url::Url;

/// Server-held Botpress settings. Secrets stay optional here so the gateway
/// can start and answer every request with a configuration error instead.
#[derive(Clone)]
pub struct GatewayConfig {
    bot_id: Option<String>,
    api_key: Option<String>,
    base_url: Url,
}

pub struct Credentials<'a> {
    pub bot_id: &'a str,
    pub api_key: &'a str,
}

impl GatewayConfig {
    pub fn new(
        bot_id: Option<String>,
        api_key: Option<String>,
        base_url: &str
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let base_url = Url::parse(base_url).map_err(|e|
            format!("Invalid Botpress base URL '{}': {}", base_url, e)
        )?;
        if base_url.cannot_be_a_base() {
            return Err(format!("Botpress base URL '{}' cannot carry a path", base_url).into());
        }

        Ok(Self {
            bot_id: bot_id.filter(|v| !v.trim().is_empty()),
            api_key: api_key.filter(|v| !v.trim().is_empty()),
            base_url,
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::new(args.bot_id.clone(), args.api_key.clone(), &args.botpress_base_url)
    }

    pub fn is_complete(&self) -> bool {
        self.bot_id.is_some() && self.api_key.is_some()
    }

    pub fn credentials(&self) -> Result<Credentials<'_>, GatewayError> {
        match (self.bot_id.as_deref(), self.api_key.as_deref()) {
            (Some(bot_id), Some(api_key)) => Ok(Credentials { bot_id, api_key }),
            _ => Err(GatewayError::Configuration),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/v1/bots/{bot_id}/conversations/{conversation_id}/messages`, with
    /// each segment percent-encoded.
    pub fn messages_endpoint(
        &self,
        bot_id: &str,
        conversation_id: &str
    ) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Configuration)?
            .pop_if_empty()
            .extend(["v1", "bots", bot_id, "conversations", conversation_id, "messages"]);
        Ok(url)
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("bot_id", &self.bot_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
