//! Message shapes exchanged with the chat server and the outbound seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Private,
    Stream,
}

/// A user listed as recipient of a private conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Stream name for stream messages, participant list for private ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayRecipient {
    Stream(String),
    Users(Vec<RecipientUser>),
}

impl Default for DisplayRecipient {
    fn default() -> Self {
        Self::Stream(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub sender_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub display_recipient: DisplayRecipient,
}

impl InboundMessage {
    pub fn private(sender_email: impl Into<String>, content: impl Into<String>) -> Self {
        let sender_email = sender_email.into();
        Self {
            content: content.into(),
            kind: MessageType::Private,
            display_recipient: DisplayRecipient::Users(vec![RecipientUser {
                email: sender_email.clone(),
                full_name: None,
            }]),
            sender_email,
            subject: None,
        }
    }

    pub fn stream(
        stream: impl Into<String>,
        subject: impl Into<String>,
        sender_email: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            kind: MessageType::Stream,
            sender_email: sender_email.into(),
            subject: Some(subject.into()),
            display_recipient: DisplayRecipient::Stream(stream.into()),
        }
    }

    /// Builds the reply addressed back to wherever this message came from.
    pub fn reply(&self, content: impl Into<String>) -> OutboundReply {
        let content = content.into();
        match self.kind {
            MessageType::Private => OutboundReply::Private {
                to: self.sender_email.clone(),
                content,
            },
            MessageType::Stream => OutboundReply::Stream {
                to: self.display_recipient.clone(),
                subject: self.subject.clone().unwrap_or_default(),
                content,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundReply {
    Private {
        to: String,
        content: String,
    },
    Stream {
        to: DisplayRecipient,
        subject: String,
        content: String,
    },
}

impl OutboundReply {
    pub fn content(&self) -> &str {
        match self {
            Self::Private { content, .. } | Self::Stream { content, .. } => content,
        }
    }

    pub fn kind(&self) -> MessageType {
        match self {
            Self::Private { .. } => MessageType::Private,
            Self::Stream { .. } => MessageType::Stream,
        }
    }
}

/// Outbound half of the chat connection, owned by the host runtime.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_message(&self, reply: OutboundReply) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn private_messages_reply_to_sender() {
        let message = InboundMessage::private("alice@example.com", "@foursquare /help");
        let reply = message.reply("hi");
        assert_eq!(
            reply,
            OutboundReply::Private {
                to: "alice@example.com".to_string(),
                content: "hi".to_string(),
            }
        );
    }

    #[test]
    fn stream_messages_reply_to_same_topic() {
        let message = InboundMessage::stream("food", "lunch", "bob@example.com", "@4sq 'Boston'");
        let reply = message.reply("hi");
        assert_eq!(
            reply,
            OutboundReply::Stream {
                to: DisplayRecipient::Stream("food".to_string()),
                subject: "lunch".to_string(),
                content: "hi".to_string(),
            }
        );
    }

    #[test]
    fn deserializes_server_payloads() {
        let stream: InboundMessage = serde_json::from_value(json!({
            "content": "@foursquare 'Chicago'",
            "type": "stream",
            "sender_email": "bob@example.com",
            "subject": "dinner",
            "display_recipient": "Denmark"
        }))
        .expect("stream message");
        assert_eq!(stream.kind, MessageType::Stream);
        assert_eq!(stream.display_recipient, DisplayRecipient::Stream("Denmark".to_string()));

        let private: InboundMessage = serde_json::from_value(json!({
            "content": "@foursquare 'Chicago'",
            "type": "private",
            "sender_email": "bob@example.com",
            "display_recipient": [{"email": "bot@example.com", "full_name": "Foursquare Bot"}]
        }))
        .expect("private message");
        assert_eq!(private.kind, MessageType::Private);
        assert!(private.subject.is_none());
    }

    #[test]
    fn replies_serialize_with_type_tag() {
        let reply = InboundMessage::stream("food", "lunch", "bob@example.com", "x").reply("ok");
        let value = serde_json::to_value(&reply).expect("serializes");
        assert_eq!(
            value,
            json!({"type": "stream", "to": "food", "subject": "lunch", "content": "ok"})
        );
    }
}
