pub mod botpress;
pub mod chat;
