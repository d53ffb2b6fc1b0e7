use serde::Deserialize;

/// How the host transport classified a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Public,
    Notice,
    Private,
}

impl MessageType {
    /// Parses a config key like `"public"` into a message type.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "public" => Some(MessageType::Public),
            "notice" => Some(MessageType::Notice),
            "private" => Some(MessageType::Private),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Public => write!(f, "public"),
            MessageType::Notice => write!(f, "notice"),
            MessageType::Private => write!(f, "private"),
        }
    }
}

/// A single message as delivered by the host transport. Immutable once
/// constructed; the pipeline never writes back into it.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Full sender mask, e.g. `Zoffix!zoffix@unaffiliated/zoffix`.
    pub sender_mask: String,
    pub message_type: MessageType,
    /// Channel the message arrived on, when it arrived on one.
    pub channel: Option<String>,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(
        sender_mask: impl Into<String>,
        message_type: MessageType,
        channel: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sender_mask: sender_mask.into(),
            message_type,
            channel,
            text: text.into(),
        }
    }

    /// Nickname portion of the sender mask (everything before the first `!`).
    pub fn nick(&self) -> &str {
        self.sender_mask
            .split('!')
            .next()
            .unwrap_or(&self.sender_mask)
    }
}

/// Per-request view carried from the matcher through dispatch to formatting.
/// Built once per matched message and discarded with the response.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub sender_mask: String,
    pub nick: String,
    pub message_type: MessageType,
    pub channel: Option<String>,
    /// The message text as received, trigger included.
    pub original: String,
    /// The message text with the matched trigger stripped.
    pub payload: String,
}

impl Metadata {
    pub fn new(message: &IncomingMessage, payload: &str) -> Self {
        Self {
            sender_mask: message.sender_mask.clone(),
            nick: message.nick().to_string(),
            message_type: message.message_type,
            channel: message.channel.clone(),
            original: message.text.clone(),
            payload: payload.to_string(),
        }
    }
}
