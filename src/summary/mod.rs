//! Text summarization: a local extractive engine with an optional hosted
//! model in front of it.
//!
//! The orchestrator's contract is that summarization never hard-fails the
//! caller: any remote failure is logged and silently replaced by the local
//! result.

pub mod extractive;
pub mod remote;

pub use extractive::summarize_local;

use crate::config::Config;
use remote::RemoteSummarizer;
use tracing::info;

/// Default sentence cap when the caller does not specify one.
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// Summarization front door: local engine plus optional remote assist.
#[derive(Clone)]
pub struct Summarizer {
    remote: RemoteSummarizer,
}

impl Summarizer {
    /// Create a new summarizer from config
    pub fn new(config: &Config) -> Self {
        Self {
            remote: RemoteSummarizer::new(config),
        }
    }

    /// Summarize `text` to at most `max_sentences` sentences.
    ///
    /// With `prefer_online` set, the hosted model is tried first and any
    /// failure (missing credential, transport, malformed response) falls
    /// back to the extractive engine. The fallback is logged, never raised.
    pub async fn summarize(&self, text: &str, max_sentences: usize, prefer_online: bool) -> String {
        if prefer_online {
            match self.remote.summarize(text, max_sentences).await {
                Ok(summary) => return summary,
                Err(err) => info!("Falling back to local summarizer: {}", err),
            }
        }
        summarize_local(text, max_sentences)
    }
}
