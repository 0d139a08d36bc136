//! Conversation client: local identity, persisted history and the send path
//! to the gateway.

pub mod conversation;
pub mod gateway;
pub mod notices;
pub mod reply;
pub mod store;

pub use conversation::{ ConversationClient, SendOutcome };
pub use gateway::{ ChatGateway, HttpGateway, SendError };
pub use reply::BotpressReply;
pub use store::{ create_store, initialize_store, FileStore, KeyValueStore, MemoryStore, StoreError };
