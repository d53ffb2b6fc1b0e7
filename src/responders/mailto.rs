use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::PipelineConfig;
use crate::dispatch::{Worker, WorkerResult};
use crate::message::Metadata;
use crate::pipeline::Responder;

/// Mailto-link obfuscator. Encodes an email address into decimal HTML
/// entities and wraps it in an anchor tag, so harvesters scraping the raw
/// page source do not see a plain address.
pub struct MailtoResponder;

#[async_trait]
impl Worker for MailtoResponder {
    async fn run(&self, payload: &str, _metadata: &Metadata) -> WorkerResult {
        let address = payload.trim();
        if address.is_empty() {
            return WorkerResult::Failure("give me an email address to obfuscate".to_string());
        }
        if !looks_like_email(address) {
            return WorkerResult::Failure(format!(
                "`{address}` does not look like an email address"
            ));
        }
        let link = format!(
            r#"<a href="{}">{}</a>"#,
            encode_entities(&format!("mailto:{address}")),
            encode_entities(address),
        );
        WorkerResult::Success(json!({
            "address": address,
            "link": link,
        }))
    }
}

impl Responder for MailtoResponder {
    fn default_config(&self) -> PipelineConfig {
        PipelineConfig {
            trigger: r"mailto\b\s+".to_string(),
            response_event: "mailto_response".to_string(),
            addressed: false,
            ..PipelineConfig::default()
        }
    }

    fn render_success(&self, data: &Value, _metadata: &Metadata) -> String {
        data["link"].as_str().unwrap_or_default().to_string()
    }
}

// Deliberately loose: one @ with something on both sides. Real validation
// belongs to whoever sends mail, not to an obfuscator.
fn looks_like_email(address: &str) -> bool {
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn encode_entities(text: &str) -> String {
    text.chars().map(|c| format!("&#{};", c as u32)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{IncomingMessage, MessageType};

    fn metadata(payload: &str) -> Metadata {
        let msg = IncomingMessage::new("x!y@z", MessageType::Private, None, payload);
        Metadata::new(&msg, payload)
    }

    #[test]
    fn test_encode_entities_is_all_decimal_entities() {
        assert_eq!(encode_entities("a@b"), "&#97;&#64;&#98;");
    }

    #[tokio::test]
    async fn test_obfuscates_into_anchor_tag() {
        let result = MailtoResponder.run("a@b.c", &metadata("a@b.c")).await;
        let data = match result {
            WorkerResult::Success(data) => data,
            WorkerResult::Failure(error) => panic!("unexpected failure: {error}"),
        };
        let link = data["link"].as_str().unwrap();
        // mailto:a@b.c — m=109 a=97 i=105 l=108 t=116 o=111 :=58
        assert!(link.starts_with(r#"<a href="&#109;&#97;&#105;&#108;&#116;&#111;&#58;"#));
        assert!(link.ends_with("</a>"));
        // The plain address never appears in the output.
        assert!(!link.contains("a@b.c"));
        assert_eq!(data["address"], "a@b.c");
    }

    #[tokio::test]
    async fn test_rejects_things_that_are_not_addresses() {
        for bad in ["", "nodomain@", "@nolocal", "two words@x.com", "plain"] {
            let result = MailtoResponder.run(bad, &metadata(bad)).await;
            assert!(
                matches!(result, WorkerResult::Failure(_)),
                "`{bad}` should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_default_trigger_skips_longer_words() {
        let pipeline = crate::pipeline::Pipeline::new(MailtoResponder).unwrap();
        let public = |text: &str| {
            IncomingMessage::new("x!y@z", MessageType::Public, Some("#demo".to_string()), text)
        };
        assert!(pipeline.handle(&public("mailtoish a@b.c")).await.is_none());
        assert!(pipeline.handle(&public("mailto a@b.c")).await.is_some());
    }

    #[test]
    fn test_render_success_returns_the_link() {
        let data = serde_json::json!({ "link": "<a href=\"x\">x</a>" });
        let rendered = MailtoResponder.render_success(&data, &metadata(""));
        assert_eq!(rendered, "<a href=\"x\">x</a>");
    }
}
