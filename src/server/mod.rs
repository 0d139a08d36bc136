pub mod api;
pub mod error;

use crate::botpress::BotpressClient;
use crate::cli::Args;
use crate::config::GatewayConfig;
use api::{ AppState, TlsPaths };
use log::{ info, warn };
use std::error::Error;
use std::net::SocketAddr;

pub struct Server {
    addr: SocketAddr,
    config: GatewayConfig,
    args: Args,
}

impl Server {
    pub fn new(args: Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let addr = format!("{}:{}", args.host, args.port)
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid listen address '{}:{}': {}", args.host, args.port, e))?;
        let config = GatewayConfig::from_args(&args)?;

        if config.is_complete() {
            info!("Gateway configured for Botpress at {}", config.base_url());
        } else {
            warn!(
                "VITE_BOTPRESS_BOT_ID or VITE_BOTPRESS_API_KEY is missing. Every proxy request will fail with a configuration error."
            );
        }

        Ok(Self { addr, config, args })
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = AppState {
            botpress: BotpressClient::new(self.config.clone()),
        };
        api::start_http_server(self.addr, state, self.tls_paths()?).await
    }

    fn tls_paths(&self) -> Result<Option<TlsPaths>, Box<dyn Error + Send + Sync>> {
        if !self.args.enable_tls {
            info!("TLS not enabled. Running plain HTTP server.");
            return Ok(None);
        }
        match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert_path), Some(key_path)) =>
                Ok(
                    Some(TlsPaths {
                        cert_path: cert_path.clone(),
                        key_path: key_path.clone(),
                    })
                ),
            (Some(_), None) | (None, Some(_)) =>
                Err("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into()),
            (None, None) => Err("--enable-tls was set but no certificate/key paths provided.".into()),
        }
    }
}
