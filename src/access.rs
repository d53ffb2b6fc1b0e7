use regex::Regex;
use tracing::debug;

use crate::config::compile_pattern;
use crate::error::ConfigError;

/// Ban-list / allow-list gate over sender masks.
///
/// When an allow-list was configured at all it is exclusive: a sender
/// matching no allow pattern is rejected, and an explicitly empty allow-list
/// rejects everyone. Without one, a sender is served unless a ban pattern
/// matches. All matching is case-insensitive over the full mask.
#[derive(Debug)]
pub struct AccessFilter {
    banned: Vec<Regex>,
    allow: Option<Vec<Regex>>,
}

impl AccessFilter {
    pub fn new(banned: &[String], allow: Option<&[String]>) -> Result<Self, ConfigError> {
        Ok(Self {
            banned: compile_all("banned", banned)?,
            allow: allow.map(|patterns| compile_all("allow", patterns)).transpose()?,
        })
    }

    /// Pure decision; no side effects beyond a debug trace on rejection.
    pub fn is_allowed(&self, sender_mask: &str) -> bool {
        if let Some(allow) = &self.allow {
            let allowed = allow.iter().any(|re| re.is_match(sender_mask));
            if !allowed {
                debug!(sender = %sender_mask, "sender matched no allow pattern");
            }
            return allowed;
        }
        if let Some(re) = self.banned.iter().find(|re| re.is_match(sender_mask)) {
            debug!(sender = %sender_mask, pattern = %re, "sender is banned");
            return false;
        }
        true
    }
}

fn compile_all(kind: &'static str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| compile_pattern(kind, pattern))
        .collect()
}
