use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use botpipe::config::AppConfig;
use botpipe::pipeline::{Pipeline, Responder, ResponseEvent};
use botpipe::responders::{LoremResponder, MailtoResponder};
use botpipe::{IncomingMessage, MessageType};

const DEFAULT_MASK: &str = "demo!demo@localhost";
const DEFAULT_CHANNEL: &str = "#demo";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,botpipe=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = if config_path.exists() {
        info!("Loading configuration from: {}", config_path.display());
        AppConfig::load(&config_path)?
    } else {
        info!(
            "No config file at {}, running on responder defaults",
            config_path.display()
        );
        AppConfig::default()
    };

    let lorem = match config.lorem {
        Some(options) => Pipeline::with_config(LoremResponder, options),
        None => Pipeline::new(LoremResponder),
    }
    .context("Failed to build the lorem pipeline")?;
    let mailto = match config.mailto {
        Some(options) => Pipeline::with_config(MailtoResponder, options),
        None => Pipeline::new(MailtoResponder),
    }
    .context("Failed to build the mailto pipeline")?;

    // Responses print as their dispatches complete, which is not
    // necessarily the order the lines came in.
    let (tx, mut rx) = mpsc::unbounded_channel::<ResponseEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if event.auto_respond {
                println!("-> {}", event.response.text);
            } else {
                println!("[{}] {}", event.event, event.response.text);
            }
        }
    });

    info!("Reading messages from stdin (\"nick!user@host text\", /msg or /notice prefix)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let Some(message) = parse_line(&line) else {
            continue;
        };
        debug!(?message, "delivering message");
        spawn_handle(lorem.clone(), message.clone(), tx.clone());
        spawn_handle(mailto.clone(), message, tx.clone());
    }

    drop(tx);
    printer.await.context("Printer task failed")?;
    Ok(())
}

fn spawn_handle<R>(
    pipeline: Pipeline<R>,
    message: IncomingMessage,
    tx: mpsc::UnboundedSender<ResponseEvent>,
) where
    R: Responder + 'static,
{
    tokio::spawn(async move {
        if let Some(event) = pipeline.handle(&message).await {
            // The host may be gone by the time a dispatch completes; a
            // dropped receiver just means nobody wants the response.
            tx.send(event).ok();
        }
    });
}

// One stdin line stands in for one delivered message. A leading "/msg" or
// "/notice" picks the message type; a first token containing `!` is taken
// as the sender mask.
fn parse_line(line: &str) -> Option<IncomingMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (message_type, rest) = if let Some(rest) = line.strip_prefix("/msg ") {
        (MessageType::Private, rest)
    } else if let Some(rest) = line.strip_prefix("/notice ") {
        (MessageType::Notice, rest)
    } else {
        (MessageType::Public, line)
    };

    let (mask, text) = match rest.split_once(char::is_whitespace) {
        Some((first, tail)) if first.contains('!') => (first.to_string(), tail.trim_start()),
        _ => (DEFAULT_MASK.to_string(), rest),
    };
    if text.is_empty() {
        return None;
    }

    let channel = match message_type {
        MessageType::Public => Some(DEFAULT_CHANNEL.to_string()),
        MessageType::Notice | MessageType::Private => None,
    };
    Some(IncomingMessage::new(mask, message_type, channel, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_line_is_public() {
        let msg = parse_line("lorem 2").unwrap();
        assert_eq!(msg.message_type, MessageType::Public);
        assert_eq!(msg.sender_mask, DEFAULT_MASK);
        assert_eq!(msg.text, "lorem 2");
        assert_eq!(msg.channel.as_deref(), Some(DEFAULT_CHANNEL));
    }

    #[test]
    fn test_parse_leading_mask_is_the_sender() {
        let msg = parse_line("Zoffix!z@unaffiliated/zoffix lorem 2").unwrap();
        assert_eq!(msg.sender_mask, "Zoffix!z@unaffiliated/zoffix");
        assert_eq!(msg.text, "lorem 2");
    }

    #[test]
    fn test_parse_msg_and_notice_prefixes() {
        let msg = parse_line("/msg mailto a@b.c").unwrap();
        assert_eq!(msg.message_type, MessageType::Private);
        assert!(msg.channel.is_none());

        let msg = parse_line("/notice lorem").unwrap();
        assert_eq!(msg.message_type, MessageType::Notice);
    }

    #[test]
    fn test_parse_skips_empty_lines() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
    }
}
