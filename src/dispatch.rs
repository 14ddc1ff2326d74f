//! Command dispatch
//!
//! Routes a line of user input to the assistant's handlers and produces a
//! typed reply for the host shell to render. Keyword matching is
//! case-insensitive; the payload keeps the caller's original casing.

use crate::calc;
use crate::summary::Summarizer;
use tracing::{debug, info};

/// Result of dispatching a command
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Show this text to the user
    Message(String),
    /// Open a URL in the system browser
    OpenUrl { url: String, note: String },
    /// Speak this text to the user
    Speak(String),
    /// User requested quit
    Quit,
    /// Command not recognized
    NotRecognized,
}

/// Dispatches user commands to the calculator and summarizer.
pub struct Dispatcher {
    summarizer: Summarizer,
    max_sentences: usize,
    prefer_online: bool,
}

impl Dispatcher {
    pub fn new(summarizer: Summarizer, max_sentences: usize, prefer_online: bool) -> Self {
        Self {
            summarizer,
            max_sentences,
            prefer_online,
        }
    }

    /// Route one command line to a handler.
    pub async fn handle(&self, input: &str) -> Reply {
        let input = input.trim();
        let low = input.to_lowercase();

        debug!("Dispatching command: '{}'", low);

        if let Some(query) = strip_keyword(input, "search ") {
            if query.is_empty() {
                return Reply::Message("Please provide a search query.".to_string());
            }
            let url = format!(
                "https://www.google.com/search?q={}",
                urlencoding::encode(query)
            );
            return Reply::OpenUrl {
                url,
                note: format!("Opened browser search for: {query}"),
            };
        }

        if low == "open browser" || low == "open google" {
            return Reply::OpenUrl {
                url: "https://www.google.com".to_string(),
                note: "Opened Google in browser.".to_string(),
            };
        }

        if let Some(expr) = strip_keyword(input, "calculate") {
            if expr.is_empty() {
                return Reply::Message("Please provide an expression to calculate.".to_string());
            }
            return match calc::evaluate(expr) {
                Ok(value) => Reply::Message(format!("{expr} = {value}")),
                Err(e) => Reply::Message(format!("Calculation error: {e}")),
            };
        }

        if low == "summarize" || low.starts_with("summarize ") {
            let text = strip_keyword(input, "summarize").unwrap_or("");
            if text.is_empty() {
                return Reply::Message("No text provided for summarization.".to_string());
            }
            info!("Summarizing...");
            let summary = self
                .summarizer
                .summarize(text, self.max_sentences, self.prefer_online)
                .await;
            return Reply::Message(format!("Summary: {summary}"));
        }

        if low == "read aloud" || low.starts_with("read aloud ") {
            let text = strip_keyword(input, "read aloud").unwrap_or("");
            if text.is_empty() {
                return Reply::Message("No text provided to read.".to_string());
            }
            return Reply::Speak(text.to_string());
        }

        if low == "exit" || low == "quit" {
            return Reply::Quit;
        }

        debug!("No command matched for: '{}'", input);
        Reply::NotRecognized
    }
}

/// Case-insensitive keyword prefix match returning the trimmed payload.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    if head.eq_ignore_ascii_case(keyword) {
        Some(input[keyword.len()..].trim())
    } else {
        None
    }
}
