use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};

use crate::config::PipelineConfig;
use crate::dispatch::{Worker, WorkerResult};
use crate::message::Metadata;
use crate::pipeline::Responder;

const DEFAULT_SENTENCES: usize = 3;
const MAX_SENTENCES: usize = 10;
const WORDS_PER_SENTENCE: std::ops::RangeInclusive<usize> = 5..=9;

const WORDS: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "ad",
    "minim",
    "veniam",
    "quis",
    "nostrud",
    "exercitation",
    "ullamco",
    "laboris",
    "nisi",
    "aliquip",
    "ex",
    "ea",
    "commodo",
    "consequat",
];

/// Lorem-ipsum generator. The payload is an optional sentence count.
pub struct LoremResponder;

#[async_trait]
impl Worker for LoremResponder {
    async fn run(&self, payload: &str, _metadata: &Metadata) -> WorkerResult {
        let requested = payload.trim();
        let sentences = if requested.is_empty() {
            DEFAULT_SENTENCES
        } else {
            match requested.parse::<usize>() {
                Ok(n) if (1..=MAX_SENTENCES).contains(&n) => n,
                Ok(_) => {
                    return WorkerResult::Failure(format!(
                        "I can give you between 1 and {MAX_SENTENCES} sentences"
                    ))
                }
                Err(_) => {
                    return WorkerResult::Failure(format!(
                        "`{requested}` is not a sentence count"
                    ))
                }
            }
        };
        WorkerResult::Success(json!({
            "sentences": sentences,
            "text": generate(sentences),
        }))
    }
}

impl Responder for LoremResponder {
    fn default_config(&self) -> PipelineConfig {
        PipelineConfig {
            trigger: r"lorem\b\s*".to_string(),
            response_event: "lorem_response".to_string(),
            // The bot nick is host knowledge; hosts turn addressed mode on
            // themselves once they supply one.
            addressed: false,
            ..PipelineConfig::default()
        }
    }

    fn render_success(&self, data: &Value, _metadata: &Metadata) -> String {
        data["text"].as_str().unwrap_or_default().to_string()
    }
}

fn generate(sentences: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..sentences)
        .map(|_| sentence(&mut rng))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence(rng: &mut impl Rng) -> String {
    let count = rng.gen_range(WORDS_PER_SENTENCE);
    let mut out = String::new();
    for i in 0..count {
        let word = WORDS.choose(rng).copied().unwrap_or("lorem");
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push(' ');
            out.push_str(word);
        }
    }
    out.push('.');
    out
}
