use serde::{ Serialize, Deserialize };
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_prefix("user", Sender::User, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::with_prefix("ai", Sender::Ai, text)
    }

    /// Locally synthesized notice shown in place of a reply.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::with_prefix("err", Sender::Ai, text)
    }

    fn with_prefix(prefix: &str, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", prefix, Uuid::new_v4()),
            sender,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_sender_in_lowercase() {
        let msg = Message { id: "m1".into(), sender: Sender::Ai, text: "salut".into() };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "m1", "sender": "ai", "text": "salut" }));
    }

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("user-"));
        assert!(Message::notice("oops").id.starts_with("err-"));
        assert_eq!(Message::ai("ok").sender, Sender::Ai);
    }
}
