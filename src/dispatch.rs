use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::message::Metadata;

/// What a worker callout produced.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResult {
    /// Structured result data, rendered by the responder.
    Success(Value),
    /// A worker-reported error message (network failure, invalid input,
    /// timeout), rendered verbatim to the user.
    Failure(String),
}

/// An external worker the pipeline hands matched payloads to. Fetches,
/// transforms, timeouts and any retry policy all live behind this seam;
/// the pipeline treats it as opaque.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self, payload: &str, metadata: &Metadata) -> WorkerResult;
}

/// Single-attempt dispatcher. One callout per request; a failure is handed
/// to the formatter, never retried here. Concurrent dispatches from
/// different messages are independent and share nothing.
pub struct RequestDispatcher<'a, W: Worker + ?Sized> {
    worker: &'a W,
}

impl<'a, W: Worker + ?Sized> RequestDispatcher<'a, W> {
    pub fn new(worker: &'a W) -> Self {
        Self { worker }
    }

    pub async fn dispatch(&self, payload: &str, metadata: &Metadata) -> WorkerResult {
        debug!(payload, sender = %metadata.sender_mask, "dispatching to worker");
        let result = self.worker.run(payload, metadata).await;
        if let WorkerResult::Failure(error) = &result {
            debug!(error, "worker reported a failure");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{IncomingMessage, MessageType};
    use serde_json::json;

    struct Upcase;

    #[async_trait]
    impl Worker for Upcase {
        async fn run(&self, payload: &str, _metadata: &Metadata) -> WorkerResult {
            if payload.is_empty() {
                WorkerResult::Failure("empty payload".to_string())
            } else {
                WorkerResult::Success(json!({ "text": payload.to_uppercase() }))
            }
        }
    }

    fn metadata(payload: &str) -> Metadata {
        let msg = IncomingMessage::new("x!y@z", MessageType::Private, None, payload);
        Metadata::new(&msg, payload)
    }

    #[tokio::test]
    async fn test_dispatch_passes_payload_through() {
        let result = RequestDispatcher::new(&Upcase)
            .dispatch("hello", &metadata("hello"))
            .await;
        assert_eq!(result, WorkerResult::Success(json!({ "text": "HELLO" })));
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_worker_failure() {
        let result = RequestDispatcher::new(&Upcase)
            .dispatch("", &metadata(""))
            .await;
        assert_eq!(result, WorkerResult::Failure("empty payload".to_string()));
    }
}
