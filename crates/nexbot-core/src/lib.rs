//! Core types and error definitions for Nexbot.
//!
//! This crate provides the foundational types shared across all Nexbot crates:
//! the knowledge-base records, error handling, configuration and the
//! append-only diagnostic log.
//!
//! # Main types
//!
//! - [`CorpusRow`] — A single question/answer pair of the QA corpus.
//! - [`Intent`] — A named category of request with example patterns and responses.
//! - [`IntentSet`] — Ordered intents plus the fallback responses.
//! - [`NexbotError`] — Unified error enum for all Nexbot subsystems.
//! - [`NexbotResult`] — Convenience alias for `Result<T, NexbotError>`.
//! - [`NexbotConfig`] — TOML configuration of a Nexbot process.
//! - [`DiagnosticSink`] — Destination for internal failure messages.

/// Process configuration loaded from `nexbot.toml`.
pub mod config;
/// Append-only diagnostic log for internal failures.
pub mod diagnostics;
/// Error types and the failure taxonomy.
pub mod error;

pub use config::{NexbotConfig, NormalizerMode};
pub use diagnostics::{DiagnosticSink, FileDiagnosticLog, MemoryDiagnosticLog, NullDiagnostics};
pub use error::{FailureKind, NexbotError, NexbotResult};

use serde::{Deserialize, Serialize};

/// Reply used whenever a conversational lookup fails internally.
pub const APOLOGY_RESPONSE: &str = "I'm here! How can I help?";

/// Greeting replies used when no intent matches and none are configured.
pub const DEFAULT_FALLBACK_RESPONSES: [&str; 3] = [
    "I'm here! How can I help?",
    "Hello there!",
    "Hi! What can I do for you?",
];

/// Returns [`DEFAULT_FALLBACK_RESPONSES`] as owned strings.
pub fn default_fallback_responses() -> Vec<String> {
    DEFAULT_FALLBACK_RESPONSES
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

// --- Knowledge base types ---

/// A single row of the question/answer corpus.
///
/// Row order within the corpus defines the index used to break ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRow {
    /// The reference question the query is compared against.
    pub question: String,
    /// The answer returned verbatim when this row wins.
    pub answer: String,
}

impl CorpusRow {
    /// Creates a new corpus row.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A named category of user request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Human-readable name of the intent.
    pub tag: String,
    /// Example phrasings. An intent without patterns can never match.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Candidate replies. Must be non-empty.
    #[serde(default)]
    pub responses: Vec<String>,
}

impl Intent {
    /// Creates a new intent from string slices.
    pub fn new(tag: impl Into<String>, patterns: &[&str], responses: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
            responses: responses.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

/// Ordered intents plus the replies used when none of them match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSet {
    /// Intents in declaration order; the first one that matches wins.
    pub intents: Vec<Intent>,
    /// Replies for empty queries and unmatched queries. Never empty.
    #[serde(default = "default_fallback_responses")]
    pub fallback_responses: Vec<String>,
}

impl IntentSet {
    /// Creates an intent set. An empty `fallback_responses` is replaced by the defaults.
    pub fn new(intents: Vec<Intent>, fallback_responses: Vec<String>) -> Self {
        let fallback_responses = if fallback_responses.is_empty() {
            default_fallback_responses()
        } else {
            fallback_responses
        };
        Self {
            intents,
            fallback_responses,
        }
    }

    /// The built-in set used when no intent document can be loaded: a single
    /// `fallback` intent with one empty pattern answering with the fallback replies.
    ///
    /// The empty pattern only matches a query that normalizes to the empty
    /// string (e.g. `"???"`); every other query reaches the fallback replies
    /// through the no-match path.
    pub fn builtin(fallback_responses: Vec<String>) -> Self {
        let set = Self::new(Vec::new(), fallback_responses);
        let intent = Intent {
            tag: "fallback".to_string(),
            patterns: vec![String::new()],
            responses: set.fallback_responses.clone(),
        };
        Self {
            intents: vec![intent],
            ..set
        }
    }

    /// Checks the invariants a loaded intent document must satisfy.
    pub fn validate(&self) -> NexbotResult<()> {
        if self.intents.is_empty() {
            return Err(NexbotError::ResourceEmpty(
                "intent document declares no intents".to_string(),
            ));
        }
        if let Some(intent) = self.intents.iter().find(|i| i.responses.is_empty()) {
            return Err(NexbotError::ResourceMalformed(format!(
                "intent '{}' has no responses",
                intent.tag
            )));
        }
        if self.fallback_responses.is_empty() {
            return Err(NexbotError::ResourceMalformed(
                "fallback responses are empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for IntentSet {
    fn default() -> Self {
        Self::builtin(default_fallback_responses())
    }
}
