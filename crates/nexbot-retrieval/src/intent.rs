use crate::fallback::pick;
use crate::normalize::TextNormalizer;
use crate::sequence::close_ratio;
use nexbot_core::{Intent, IntentSet, NexbotResult};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Default minimum sequence ratio for a pattern to count as a match.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// The named intent matched.
    Intent(String),
    /// No intent matched, or the query was blank.
    Fallback,
}

/// A sampled reply and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply text, taken verbatim from the configured responses.
    pub text: String,
    /// Matched intent, or the fallback set.
    pub source: ReplySource,
}

/// First-match-wins fuzzy intent classifier.
///
/// Intents are scanned in declaration order and the first one owning a
/// pattern within the threshold wins, even if a later intent holds a closer
/// pattern.
pub struct IntentMatcher {
    normalizer: Arc<TextNormalizer>,
    threshold: f64,
}

impl IntentMatcher {
    /// Create a matcher with the default threshold of 0.5.
    pub fn new(normalizer: Arc<TextNormalizer>) -> Self {
        Self {
            normalizer,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the acceptance threshold. Chainable builder method.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Acceptance threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Closest normalized pattern of `intent` to an already-normalized query,
    /// with its ratio, if any clears the threshold.
    pub fn closest_pattern(&self, normalized_query: &str, intent: &Intent) -> Option<(String, f64)> {
        let mut best: Option<(String, f64)> = None;
        for pattern in &intent.patterns {
            let normalized = self.normalizer.normalize(pattern);
            if let Some(ratio) = close_ratio(normalized_query, &normalized, self.threshold) {
                if best.as_ref().map_or(true, |(_, r)| ratio > *r) {
                    best = Some((normalized, ratio));
                }
            }
        }
        best
    }

    /// First intent, in declaration order, that matches `query`.
    pub fn classify<'a>(&self, query: &str, intents: &'a IntentSet) -> Option<&'a Intent> {
        let normalized_query = self.normalizer.normalize(query);
        intents.intents.iter().find(|intent| {
            match self.closest_pattern(&normalized_query, intent) {
                Some((pattern, ratio)) => {
                    debug!(tag = %intent.tag, %pattern, ratio, "intent matched");
                    true
                }
                None => false,
            }
        })
    }

    /// Sample a reply for `query`.
    ///
    /// Blank queries and unmatched queries draw from the fallback responses.
    /// A matched intent without responses is an error.
    pub fn respond<R: Rng + ?Sized>(
        &self,
        query: &str,
        intents: &IntentSet,
        rng: &mut R,
    ) -> NexbotResult<Reply> {
        if query.trim().is_empty() {
            return fallback_reply(intents, rng);
        }

        match self.classify(query, intents) {
            Some(intent) => Ok(Reply {
                text: pick(&intent.responses, rng)?.to_string(),
                source: ReplySource::Intent(intent.tag.clone()),
            }),
            None => fallback_reply(intents, rng),
        }
    }
}

fn fallback_reply<R: Rng + ?Sized>(intents: &IntentSet, rng: &mut R) -> NexbotResult<Reply> {
    Ok(Reply {
        text: pick(&intents.fallback_responses, rng)?.to_string(),
        source: ReplySource::Fallback,
    })
}
