use std::collections::HashMap;

use regex::{escape, Regex};
use tracing::debug;

use crate::config::{compile_pattern, PipelineConfig};
use crate::error::ConfigError;
use crate::message::{IncomingMessage, MessageType};

/// Characters accepted between the bot nick and the request, besides plain
/// whitespace: "Bot, doctype ..." / "Bot: doctype ...".
const ADDRESS_SEPARATORS: &str = ",:;.!?";

/// Outcome of trigger matching. `payload` is the message text with the
/// matched trigger prefix stripped; it is only meaningful when `matched`.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub matched: bool,
    pub payload: String,
    pub original: String,
}

impl MatchResult {
    fn miss(original: &str) -> Self {
        Self {
            matched: false,
            payload: String::new(),
            original: original.to_string(),
        }
    }
}

/// Decides whether a message constitutes a request and extracts the payload.
///
/// Triggers are case-insensitive regexes that must match at the very start
/// of the text. Public messages in addressed mode must first name the bot;
/// notices and private messages are checked against the trigger directly.
#[derive(Debug)]
pub struct TriggerMatcher {
    global: Regex,
    per_type: HashMap<MessageType, Regex>,
    address_prefix: Option<Regex>,
    listen_for: Vec<MessageType>,
}

impl TriggerMatcher {
    pub fn new(config: &PipelineConfig) -> Result<Self, ConfigError> {
        if config.listen_for.is_empty() {
            return Err(ConfigError::EmptyListenFor);
        }

        let address_prefix = if config.addressed {
            if config.bot_nick.is_empty() {
                return Err(ConfigError::AddressedWithoutNick);
            }
            let pattern = format!(
                r"^\s*{}[{}]?\s+",
                escape(&config.bot_nick),
                escape(ADDRESS_SEPARATORS)
            );
            Some(compile_pattern("bot_nick", &pattern)?)
        } else {
            None
        };

        let mut per_type = HashMap::new();
        for (key, pattern) in &config.triggers {
            let message_type = MessageType::parse(key)
                .ok_or_else(|| ConfigError::UnknownMessageType(key.clone()))?;
            per_type.insert(message_type, compile_pattern("triggers", pattern)?);
        }

        Ok(Self {
            global: compile_pattern("trigger", &config.trigger)?,
            per_type,
            address_prefix,
            listen_for: config.listen_for.clone(),
        })
    }

    pub fn matches(&self, message: &IncomingMessage) -> MatchResult {
        if !self.listen_for.contains(&message.message_type) {
            return MatchResult::miss(&message.text);
        }

        let mut text: &str = &message.text;

        // Addressed mode applies to public messages only; notices and
        // private messages go straight to the trigger.
        if message.message_type == MessageType::Public {
            if let Some(prefix) = &self.address_prefix {
                match prefix.find(text) {
                    Some(m) => text = &text[m.end()..],
                    None => {
                        debug!(text = %message.text, "public message does not address the bot");
                        return MatchResult::miss(&message.text);
                    }
                }
            }
        }

        let trigger = self
            .per_type
            .get(&message.message_type)
            .unwrap_or(&self.global);

        match trigger.find(text) {
            Some(m) if m.start() == 0 => MatchResult {
                matched: true,
                payload: text[m.end()..].to_string(),
                original: message.text.clone(),
            },
            _ => MatchResult::miss(&message.text),
        }
    }
}
