//! Builders for webhook payloads.

use inlet_core::NewMessage;
use serde_json::Value;

/// Builder for inbound messages with realistic defaults.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: NewMessage,
}

impl MessageBuilder {
    /// Starts a message with the given id, from `+14155552671` to
    /// `+14155550000` at `2025-01-01T00:00:00Z` saying `hello`.
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message: NewMessage {
                message_id: message_id.into(),
                sender: "+14155552671".to_string(),
                recipient: "+14155550000".to_string(),
                ts: "2025-01-01T00:00:00Z".to_string(),
                text: Some("hello".to_string()),
            },
        }
    }

    /// Sets the sender.
    #[must_use]
    pub fn from(mut self, sender: impl Into<String>) -> Self {
        self.message.sender = sender.into();
        self
    }

    /// Sets the recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.message.recipient = recipient.into();
        self
    }

    /// Sets the sender timestamp.
    #[must_use]
    pub fn ts(mut self, ts: impl Into<String>) -> Self {
        self.message.ts = ts.into();
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.message.text = Some(text.into());
        self
    }

    /// Removes the body text.
    #[must_use]
    pub fn no_text(mut self) -> Self {
        self.message.text = None;
        self
    }

    /// Returns the message.
    pub fn build(&self) -> NewMessage {
        self.message.clone()
    }

    /// Returns the wire JSON for the message.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.message).unwrap_or(Value::Null)
    }

    /// Returns the serialized request body.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.message).unwrap_or_default()
    }
}
