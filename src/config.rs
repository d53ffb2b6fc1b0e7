use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::message::MessageType;

/// Options recognized by one pipeline instance.
///
/// Every field has a default so a responder can ship a working option set
/// and a host config file only overrides what it cares about. Patterns are
/// plain strings here; they are compiled (and validated) when the pipeline
/// is built.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Global trigger pattern, matched at the start of the (possibly
    /// nick-stripped) text. An empty pattern matches every message.
    #[serde(default)]
    pub trigger: String,
    /// Per-message-type trigger overrides, keyed by "public", "notice" or
    /// "private". Keys are validated at build time.
    #[serde(default)]
    pub triggers: HashMap<String, String>,
    /// Require public messages to address the bot by nick before the
    /// trigger is considered.
    #[serde(default = "default_true")]
    pub addressed: bool,
    /// The nick the bot answers to. Required when `addressed` is on.
    #[serde(default)]
    pub bot_nick: String,
    /// Sender masks matching any of these patterns are dropped silently.
    #[serde(default)]
    pub banned: Vec<String>,
    /// When present (even empty), only senders matching one of these
    /// patterns are served. An explicitly empty list rejects everyone.
    #[serde(default)]
    pub allow: Option<Vec<String>>,
    /// Message types the pipeline reacts to at all.
    #[serde(default = "default_listen_for")]
    pub listen_for: Vec<MessageType>,
    /// Maximum response length in characters before truncation.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Whether the host should send the response back to the channel
    /// itself, rather than only raising the event.
    #[serde(default = "default_true")]
    pub auto_respond: bool,
    /// Name the emitted response event carries.
    #[serde(default = "default_response_event")]
    pub response_event: String,
    /// Host-framework passthrough: whether a matched message should be
    /// withheld from other consumers.
    #[serde(default = "default_true")]
    pub eat: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trigger: String::new(),
            triggers: HashMap::new(),
            addressed: true,
            bot_nick: String::new(),
            banned: Vec::new(),
            allow: None,
            listen_for: default_listen_for(),
            max_length: default_max_length(),
            auto_respond: true,
            response_event: default_response_event(),
            eat: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_listen_for() -> Vec<MessageType> {
    vec![MessageType::Public, MessageType::Notice]
}

fn default_max_length() -> usize {
    350
}

fn default_response_event() -> String {
    "response".to_string()
}

/// Compiles one configured pattern, case-insensitively. `kind` names the
/// option the pattern came from so a bad regex is traceable.
pub(crate) fn compile_pattern(kind: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
            source,
        })
}

/// Launcher configuration: one optional section per bundled responder.
/// A missing section means the responder runs on its own defaults.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub lorem: Option<PipelineConfig>,
    #[serde(default)]
    pub mailto: Option<PipelineConfig>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
