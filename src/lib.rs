//! Command trigger & response pipeline for chat bots.
//!
//! One [`Pipeline`] runs each incoming message through four stages:
//! access filtering (ban/allow lists over the sender mask), trigger
//! matching (with optional addressed mode for public channels), an async
//! callout to an opaque worker, and bounded response formatting. Rejections
//! are silent; worker failures are rendered, never dropped.
//!
//! The host transport owns delivery and emission; this crate is the shared
//! contract between them. Domains plug in through the [`Responder`] trait.

pub mod access;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod message;
pub mod pipeline;
pub mod responders;
pub mod trigger;

pub use access::AccessFilter;
pub use config::{AppConfig, PipelineConfig};
pub use dispatch::{RequestDispatcher, Worker, WorkerResult};
pub use error::ConfigError;
pub use format::{shorten_url, FormattedResponse, ResponseFormatter};
pub use message::{IncomingMessage, MessageType, Metadata};
pub use pipeline::{Pipeline, Responder, ResponseEvent};
pub use trigger::{MatchResult, TriggerMatcher};
