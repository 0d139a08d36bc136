use serde::Deserialize;
use serde_json::Value;

pub const UNRECOGNIZED_REPLY: &str = "Erreur: Je n'ai pas pu lire la réponse. (Format inconnu)";

/// The reply envelopes Botpress is known to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotpressReply {
    /// `{"message": {"text": "..."}}`
    Message(String),
    /// `{"responses": [{"text": "..."}, ...]}`, first element only
    Responses(String),
    Unrecognized,
}

#[derive(Deserialize)]
struct TextBlock {
    text: String,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: Value,
}

#[derive(Deserialize)]
struct ResponsesEnvelope {
    responses: Vec<Value>,
}

fn text_of(block: &Value) -> Option<String> {
    if !block.is_object() {
        return None;
    }
    TextBlock::deserialize(block)
        .ok()
        .map(|b| b.text)
        .filter(|text| !text.is_empty())
}

impl BotpressReply {
    /// Tries each known shape in priority order. An empty `text` does not count
    /// as a match.
    pub fn decode(payload: &Value) -> Self {
        // serde would also accept structs encoded as JSON arrays
        if !payload.is_object() {
            return Self::Unrecognized;
        }

        if let Ok(envelope) = MessageEnvelope::deserialize(payload) {
            if let Some(text) = text_of(&envelope.message) {
                return Self::Message(text);
            }
        }

        if let Ok(envelope) = ResponsesEnvelope::deserialize(payload) {
            if let Some(text) = envelope.responses.first().and_then(text_of) {
                return Self::Responses(text);
            }
        }

        Self::Unrecognized
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Message(text) | Self::Responses(text) => text,
            Self::Unrecognized => UNRECOGNIZED_REPLY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_message_envelope() {
        let reply = BotpressReply::decode(&json!({ "message": { "text": "hello" } }));
        assert_eq!(reply, BotpressReply::Message("hello".into()));
        assert_eq!(reply.into_text(), "hello");
    }

    #[test]
    fn reads_first_response() {
        let reply = BotpressReply::decode(
            &json!({ "responses": [{ "text": "world" }, { "text": "ignored" }] })
        );
        assert_eq!(reply.into_text(), "world");
    }

    #[test]
    fn message_wins_over_responses() {
        let reply = BotpressReply::decode(
            &json!({ "message": { "text": "a" }, "responses": [{ "text": "b" }] })
        );
        assert_eq!(reply, BotpressReply::Message("a".into()));
    }

    #[test]
    fn falls_through_to_responses_when_message_text_is_not_usable() {
        let payload = json!({ "message": { "text": 42 }, "responses": [{ "text": "b" }] });
        assert_eq!(BotpressReply::decode(&payload), BotpressReply::Responses("b".into()));

        let payload = json!({ "message": { "text": "" }, "responses": [{ "text": "b" }] });
        assert_eq!(BotpressReply::decode(&payload), BotpressReply::Responses("b".into()));
    }

    #[test]
    fn unknown_shapes_use_fallback_text() {
        for payload in [
            json!({ "foo": "bar" }),
            json!({ "responses": [] }),
            json!({ "responses": ["plain", { "text": "second" }] }),
            json!({ "message": "flat" }),
            json!({ "message": ["nested"] }),
            json!(null),
            json!([1, 2, 3]),
            json!("text"),
        ] {
            assert_eq!(BotpressReply::decode(&payload), BotpressReply::Unrecognized);
        }
        assert_eq!(BotpressReply::Unrecognized.into_text(), UNRECOGNIZED_REPLY);
    }
}
