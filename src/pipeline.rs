use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::access::AccessFilter;
use crate::config::PipelineConfig;
use crate::dispatch::{RequestDispatcher, Worker, WorkerResult};
use crate::error::ConfigError;
use crate::format::{FormattedResponse, ResponseFormatter};
use crate::message::{IncomingMessage, MessageType, Metadata};
use crate::trigger::TriggerMatcher;

/// Domain capability a pipeline is built around: the default option set,
/// the worker callout (via the [`Worker`] supertrait) and how a successful
/// result reads in the channel.
pub trait Responder: Worker {
    fn default_config(&self) -> PipelineConfig;

    fn render_success(&self, data: &Value, metadata: &Metadata) -> String;

    /// The page/URL the request operated on, when the domain has one.
    /// Drives the `[page] error` failure shape; `None` renders errors plain.
    fn page(&self, _metadata: &Metadata) -> Option<String> {
        None
    }
}

/// The final emitted value for one handled message, carrying everything the
/// host needs to route the response.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    /// Configured event name, e.g. `"lorem_response"`.
    pub event: String,
    pub response: FormattedResponse,
    pub message_type: MessageType,
    pub channel: Option<String>,
    pub sender_mask: String,
    /// Whether the host should send the text back itself.
    pub auto_respond: bool,
    /// Whether the matched message should be withheld from other consumers.
    pub eat: bool,
}

// Compiled, immutable view of one configuration. Built once, shared by all
// requests started under it.
struct Snapshot {
    config: PipelineConfig,
    access: AccessFilter,
    matcher: TriggerMatcher,
    formatter: ResponseFormatter,
}

impl Snapshot {
    fn build(config: PipelineConfig) -> Result<Self, ConfigError> {
        if config.max_length == 0 {
            return Err(ConfigError::ZeroMaxLength);
        }
        let access = AccessFilter::new(&config.banned, config.allow.as_deref())?;
        let matcher = TriggerMatcher::new(&config)?;
        let formatter = ResponseFormatter::new(config.max_length);
        Ok(Self {
            config,
            access,
            matcher,
            formatter,
        })
    }
}

/// One configured trigger-to-response pipeline.
///
/// Stateless per message: every invocation runs filter → match → dispatch →
/// format over an immutable configuration snapshot, and nothing survives
/// past the emitted event. Cloning is cheap and clones share the responder,
/// so concurrent in-flight requests are independent.
pub struct Pipeline<R: Responder> {
    responder: Arc<R>,
    snapshot: Arc<Snapshot>,
}

impl<R: Responder> Clone for Pipeline<R> {
    fn clone(&self) -> Self {
        Self {
            responder: Arc::clone(&self.responder),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<R: Responder> Pipeline<R> {
    /// Builds a pipeline from the responder's default option set.
    pub fn new(responder: R) -> Result<Self, ConfigError> {
        let config = responder.default_config();
        Self::with_config(responder, config)
    }

    pub fn with_config(responder: R, config: PipelineConfig) -> Result<Self, ConfigError> {
        let snapshot = Snapshot::build(config)?;
        info!(
            event = %snapshot.config.response_event,
            trigger = %snapshot.config.trigger,
            "pipeline ready"
        );
        Ok(Self {
            responder: Arc::new(responder),
            snapshot: Arc::new(snapshot),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.snapshot.config
    }

    /// Builds a pipeline over the same responder with a new configuration.
    /// The swap is atomic from the caller's point of view: requests already
    /// in flight keep the snapshot they started with.
    pub fn reconfigure(&self, config: PipelineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            responder: Arc::clone(&self.responder),
            snapshot: Arc::new(Snapshot::build(config)?),
        })
    }

    /// Runs one message through the pipeline. Returns `None` when the
    /// sender is not allowed or the message is not a request for us; a
    /// worker failure still produces a response, never a silent drop.
    pub async fn handle(&self, message: &IncomingMessage) -> Option<ResponseEvent> {
        let snapshot = &self.snapshot;

        if !snapshot.access.is_allowed(&message.sender_mask) {
            return None;
        }

        let matched = snapshot.matcher.matches(message);
        if !matched.matched {
            return None;
        }
        debug!(payload = %matched.payload, "message matched trigger");

        let metadata = Metadata::new(message, &matched.payload);
        let result = RequestDispatcher::new(self.responder.as_ref())
            .dispatch(&metadata.payload, &metadata)
            .await;

        let response = match &result {
            WorkerResult::Success(data) => {
                let body = self.responder.render_success(data, &metadata);
                snapshot.formatter.format_success(&body, &metadata)
            }
            WorkerResult::Failure(error) => {
                let page = self.responder.page(&metadata);
                snapshot
                    .formatter
                    .format_failure(error, page.as_deref(), &metadata)
            }
        };

        Some(ResponseEvent {
            event: snapshot.config.response_event.clone(),
            response,
            message_type: metadata.message_type,
            channel: metadata.channel.clone(),
            sender_mask: metadata.sender_mask.clone(),
            auto_respond: snapshot.config.auto_respond,
            eat: snapshot.config.eat,
        })
    }
}
