use clap::{ Parser, Subcommand };

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the Botpress proxy gateway (default)
    Serve,
    /// Chat with PolyÉDI from the terminal through a running gateway
    Chat,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    // --- Botpress Upstream Args ---
    /// Botpress bot identifier. Requests are rejected with a configuration error when unset.
    #[arg(long, env = "VITE_BOTPRESS_BOT_ID")]
    pub bot_id: Option<String>,

    /// Botpress API key sent as a bearer token. Never logged.
    #[arg(long, env = "VITE_BOTPRESS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Botpress REST API.
    #[arg(long, env = "BOTPRESS_BASE_URL", default_value = "https://api.botpress.cloud")]
    pub botpress_base_url: String,

    // --- Gateway Server Args ---
    /// Interface the gateway binds to.
    #[arg(long, env = "PROXY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port the gateway listens on.
    #[arg(long, env = "PROXY_PORT", default_value = "8787")]
    pub port: u16,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Conversation Client Args ---
    /// Public Botpress client identifier. Without it the chat reports itself as unconfigured.
    #[arg(long, env = "VITE_BOTPRESS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Gateway endpoint the chat client posts to.
    #[arg(long, env = "GATEWAY_URL", default_value = "http://127.0.0.1:8787/api/botpress")]
    pub gateway_url: String,

    /// Local conversation store type (file, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "file")]
    pub store_type: String,

    /// Directory holding the file store.
    #[arg(long, env = "STORE_PATH", default_value = ".polyedi")]
    pub store_path: String,

    /// Keep only the newest N messages in the local history. Unbounded when unset.
    #[arg(long, env = "HISTORY_LIMIT", value_parser = parse_history_limit)]
    pub history_limit: Option<usize>,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

fn parse_history_limit(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("history limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(e) => Err(format!("invalid history limit '{}': {}", value, e)),
    }
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    pub fn client_configured(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}
