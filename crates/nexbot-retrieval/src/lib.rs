//! Matching pipelines behind Nexbot.
//!
//! Two independent strategies share the same normalize → score → select shape:
//!
//! - [`qa`] ranks a question/answer corpus with TF-IDF vectors and cosine
//!   similarity and returns the single best row.
//! - [`intent`] scans intents in declaration order with a character-sequence
//!   ratio and samples a reply from the first intent that clears the threshold.
//!
//! # Main types
//!
//! - [`TextNormalizer`] — Never-failing text normalization over a pluggable [`Normalizer`].
//! - [`TfidfSpace`] — TF-IDF vector space fitted over corpus questions.
//! - [`SequenceMatcher`] — Matching-blocks similarity ratio between two strings.
//! - [`IntentMatcher`] — First-match-wins fuzzy intent classifier.

/// Uniform random reply selection.
pub mod fallback;
/// Fuzzy intent classification and reply sampling.
pub mod intent;
/// Text normalization capability.
pub mod normalize;
/// Best-answer retrieval over the question/answer corpus.
pub mod qa;
/// Character-sequence similarity ratio.
pub mod sequence;
/// TF-IDF vector space and cosine similarity.
pub mod tfidf;

pub use fallback::pick;
pub use intent::{IntentMatcher, Reply, ReplySource};
pub use normalize::{
    FullNormalizer, NaiveNormalizer, Normalizer, RootReducer, SnowballReducer, TextNormalizer,
};
pub use qa::{answer_or_error, best_answer, best_match, describe_failure, BestMatch};
pub use sequence::SequenceMatcher;
pub use tfidf::{cosine_similarity, SparseVector, TfidfSpace};
