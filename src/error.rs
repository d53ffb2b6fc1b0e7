use thiserror::Error;

/// Setup-time configuration failures. These surface to the operator when a
/// pipeline is built; nothing here is recoverable at request time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {kind} pattern `{pattern}`: {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("listen_for must include at least one message type")]
    EmptyListenFor,

    #[error("unknown message type `{0}` in triggers (expected public, notice or private)")]
    UnknownMessageType(String),

    #[error("addressed mode requires a non-empty bot_nick")]
    AddressedWithoutNick,

    #[error("max_length must be nonzero")]
    ZeroMaxLength,
}
