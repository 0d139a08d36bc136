use crate::models::botpress::ProxyRequest;
use crate::models::chat::Message;
use chrono::Utc;
use log::{ debug, error, warn };
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::gateway::{ ChatGateway, SendError };
use super::notices::{ welcome, SEND_FAILED };
use super::reply::BotpressReply;
use super::store::{ KeyValueStore, StoreError };

pub const CHAT_HISTORY_KEY: &str = "agoraChatHistory";
pub const CONVERSATION_ID_KEY: &str = "agoraConversationId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was appended or sent.
    Ignored,
    Delivered(Message),
    /// The appended notice that replaced the reply.
    Failed(Message),
}

/// Marks one send as in flight until dropped.
struct TypingGuard(Arc<AtomicUsize>);

impl TypingGuard {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ConversationClient {
    store: Arc<dyn KeyValueStore>,
    gateway: Arc<dyn ChatGateway>,
    history: Mutex<Vec<Message>>,
    conversation_id: Mutex<Option<String>>,
    in_flight: Arc<AtomicUsize>,
    history_limit: Option<usize>,
}

pub fn generate_conversation_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("agora-user-{}-{}", Utc::now().timestamp_millis(), suffix)
}

impl ConversationClient {
    /// Rehydrates history from `store`. Missing or unreadable history starts a
    /// fresh conversation with the welcome message; a failing store starts empty.
    /// A `history_limit` of zero means unbounded.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ChatGateway>,
        history_limit: Option<usize>
    ) -> Self {
        let history = match store.read(CHAT_HISTORY_KEY).await {
            Ok(Some(raw)) =>
                match serde_json::from_str::<Vec<Message>>(&raw) {
                    Ok(messages) => messages,
                    Err(e) => {
                        warn!("Stored chat history is unreadable, starting over: {}", e);
                        vec![welcome()]
                    }
                }
            Ok(None) => vec![welcome()],
            Err(e) => {
                error!("Chat history store unavailable: {}", e);
                Vec::new()
            }
        };

        let client = Self {
            store,
            gateway,
            history: Mutex::new(Vec::new()),
            conversation_id: Mutex::new(None),
            in_flight: Arc::new(AtomicUsize::new(0)),
            history_limit: history_limit.filter(|&limit| limit > 0),
        };
        client.replace_history(history).await;
        client
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Returns the persisted conversation id, minting and storing one first if
    /// none exists yet.
    pub async fn conversation_id(&self) -> Result<String, StoreError> {
        let mut cached = self.conversation_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let id = match self.store.read(CONVERSATION_ID_KEY).await? {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                let id = generate_conversation_id();
                self.store.write(CONVERSATION_ID_KEY, &id).await?;
                debug!("Created conversation id {}", id);
                id
            }
        };
        *cached = Some(id.clone());
        Ok(id)
    }

    pub async fn send_message(&self, user_input: &str) -> SendOutcome {
        if user_input.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        self.append(Message::user(user_input)).await;
        let _typing = TypingGuard::start(&self.in_flight);

        match self.request_reply(user_input).await {
            Ok(text) => {
                let reply = Message::ai(text);
                self.append(reply.clone()).await;
                SendOutcome::Delivered(reply)
            }
            Err(e) => {
                error!("Failed to fetch from Botpress: {}", e);
                let notice = Message::notice(SEND_FAILED);
                self.append(notice.clone()).await;
                SendOutcome::Failed(notice)
            }
        }
    }

    /// Starts a new conversation: fresh id, history back to the welcome message.
    pub async fn reset(&self) -> Result<String, StoreError> {
        let id = {
            let mut cached = self.conversation_id.lock().await;
            let id = generate_conversation_id();
            self.store.write(CONVERSATION_ID_KEY, &id).await?;
            *cached = Some(id.clone());
            id
        };
        self.replace_history(vec![welcome()]).await;
        Ok(id)
    }

    async fn request_reply(&self, text: &str) -> Result<String, SendError> {
        let conversation_id = self.conversation_id().await?;
        let request = ProxyRequest { text: text.to_string(), conversation_id };
        let payload = self.gateway.post_message(&request).await?;
        debug!("Botpress response: {}", payload);

        let reply = BotpressReply::decode(&payload);
        if reply == BotpressReply::Unrecognized {
            warn!("Unknown Botpress response format: {}", payload);
        }
        Ok(reply.into_text())
    }

    async fn append(&self, message: Message) {
        let mut history = self.history.lock().await;
        history.push(message);
        self.enforce_limit(&mut history);
        self.persist(&history).await;
    }

    async fn replace_history(&self, messages: Vec<Message>) {
        let mut history = self.history.lock().await;
        *history = messages;
        self.enforce_limit(&mut history);
        self.persist(&history).await;
    }

    fn enforce_limit(&self, history: &mut Vec<Message>) {
        if let Some(limit) = self.history_limit {
            if history.len() > limit {
                let excess = history.len() - limit;
                history.drain(..excess);
            }
        }
    }

    /// Full snapshot write, called with the history lock held.
    async fn persist(&self, history: &[Message]) {
        let serialized = match serde_json::to_string(history) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to serialize chat history: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.write(CHAT_HISTORY_KEY, &serialized).await {
            warn!("Failed to persist chat history: {}", e);
        }
    }
}
