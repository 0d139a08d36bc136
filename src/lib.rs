pub mod botpress;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod models;
pub mod server;

use cli::{ Args, Command };
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Mode: {:?}", args.command());
    info!("Botpress Base URL: {}", args.botpress_base_url);
    info!("Bot ID: {}", args.bot_id.as_deref().unwrap_or("<missing>"));
    info!("API Key: {}", if args.api_key.is_some() { "<set>" } else { "<missing>" });
    info!("Listen Address: {}:{}", args.host, args.port);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("Client Configured: {}", args.client_configured());
    info!("Gateway URL: {}", args.gateway_url);
    info!("Store Type: {}", args.store_type);
    info!("Store Path: {}", args.store_path);
    match args.history_limit {
        Some(limit) => info!("History Limit: {}", limit),
        None => info!("History Limit: unbounded"),
    }
    info!("-------------------------");

    match args.command() {
        Command::Serve => {
            let server = Server::new(args)?;
            server.run().await?;
        }
        Command::Chat => console::run_chat(&args).await?,
    }

    Ok(())
}
