use crate::cli::Args;
use crate::client::notices::{ status_notices, CANNOT_SEND, RESET_FAILED };
use crate::client::{ initialize_store, ConversationClient, HttpGateway, SendOutcome };
use crate::models::chat::{ Message, Sender };
use log::{ error, info, warn };
use std::error::Error;
use std::sync::Arc;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader };

const RESET_COMMAND: &str = "/reset";
const QUIT_COMMAND: &str = "/quit";

pub async fn run_chat(args: &Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let store = initialize_store(args)?;
    let gateway = Arc::new(HttpGateway::new(args.gateway_url.clone()));
    info!("Chat client posting to {}", args.gateway_url);

    let client = ConversationClient::load(store, gateway, args.history_limit).await;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_session(&client, args.client_configured(), stdin, &mut stdout).await
}

/// Line-oriented chat loop. Returns when input ends or on `/quit`.
pub async fn run_session<R, W>(
    client: &ConversationClient,
    configured: bool,
    input: R,
    output: &mut W
) -> Result<(), Box<dyn Error + Send + Sync>>
    where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin
{
    for notice in status_notices(configured) {
        write_message(output, &notice).await?;
    }
    for message in client.messages().await {
        write_message(output, &message).await?;
    }

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {
                continue;
            }
            QUIT_COMMAND => {
                break;
            }
            RESET_COMMAND => {
                match client.reset().await {
                    Ok(id) => {
                        info!("Started conversation {}", id);
                        for message in client.messages().await {
                            write_message(output, &message).await?;
                        }
                    }
                    Err(e) => {
                        error!("Failed to start a new conversation: {}", e);
                        write_message(output, &Message::notice(RESET_FAILED)).await?;
                    }
                }
                continue;
            }
            _ => {}
        }

        if !configured {
            warn!("Refusing to send: Botpress client id is not configured");
            write_message(output, &Message::notice(CANNOT_SEND)).await?;
            continue;
        }

        output.write_all("PolyÉDI écrit...\n".as_bytes()).await?;
        output.flush().await?;
        match client.send_message(&line).await {
            SendOutcome::Ignored => {}
            SendOutcome::Delivered(reply) | SendOutcome::Failed(reply) => {
                write_message(output, &reply).await?;
            }
        }
    }

    Ok(())
}

async fn write_message<W>(output: &mut W, message: &Message) -> std::io::Result<()>
    where W: AsyncWrite + Unpin
{
    let speaker = match message.sender {
        Sender::User => "Vous",
        Sender::Ai => "PolyÉDI",
    };
    output.write_all(format!("{}: {}\n", speaker, message.text).as_bytes()).await?;
    output.flush().await
}
