#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the nexbot-retrieval crate.
//!
//! Covers corpus retrieval properties, intent matching properties, the
//! preprocessing asymmetry between the two pipelines, and reply sampling.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use nexbot_core::{CorpusRow, Intent, IntentSet, NormalizerMode, NullDiagnostics};
use nexbot_retrieval::{
    answer_or_error, best_answer, best_match, IntentMatcher, ReplySource, TextNormalizer,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn faq() -> Vec<CorpusRow> {
    vec![
        CorpusRow::new("What is a variable?", "A named storage location."),
        CorpusRow::new("What is a loop?", "A block that repeats."),
        CorpusRow::new("How do I declare a function?", "Use the fn keyword."),
        CorpusRow::new("What is a variable?", "Duplicate row, never returned."),
        CorpusRow::new("Why does my loop never end?", "Check the exit condition."),
    ]
}

fn normalizer(mode: NormalizerMode) -> Arc<TextNormalizer> {
    Arc::new(TextNormalizer::new(mode, Arc::new(NullDiagnostics)))
}

fn intents() -> IntentSet {
    IntentSet::new(
        vec![
            Intent::new("greeting", &["hello", "hi there", "good morning"], &["Hi!", "Hello!"]),
            Intent::new("goodbye", &["bye", "see you later"], &["Goodbye!", "See you!"]),
            Intent::new("courses", &["show me the courses", "which courses are available"], &["Open the Courses tab."]),
        ],
        vec!["I'm here!".to_string(), "Could you rephrase?".to_string()],
    )
}

// ---------------------------------------------------------------------------
// 1. Corpus retrieval
// ---------------------------------------------------------------------------

#[test]
fn answers_are_returned_verbatim() {
    let corpus = faq();
    let answers: HashSet<&str> = corpus.iter().map(|r| r.answer.as_str()).collect();
    for query in ["variable", "loops", "how to write a function", "", "???", "completely unrelated"] {
        let answer = best_answer(query, &corpus).unwrap();
        assert!(answers.contains(answer), "{answer:?} is not a corpus answer");
    }
}

#[test]
fn every_question_retrieves_its_first_occurrence() {
    let corpus = faq();
    for (i, row) in corpus.iter().enumerate() {
        let first = corpus.iter().position(|r| r.question == row.question).unwrap();
        let found = best_match(&row.question, &corpus).unwrap();
        assert_eq!(found.index, first, "question {i} resolved to row {}", found.index);
        assert!((found.score - 1.0).abs() < 1e-9);
    }
}

#[test]
fn empty_corpus_never_panics() {
    assert_eq!(answer_or_error("", &[]), "Error: The dataset file is empty");
}

#[test]
fn scenario_whats_your_name() {
    let corpus = vec![
        CorpusRow::new("What is your name?", "I am a bot."),
        CorpusRow::new("How old are you?", "I am timeless."),
    ];
    assert_eq!(answer_or_error("what's your name", &corpus), "I am a bot.");
}

// ---------------------------------------------------------------------------
// 2. Intent matching
// ---------------------------------------------------------------------------

#[test]
fn blank_query_draws_only_from_fallback() {
    let matcher = IntentMatcher::new(normalizer(NormalizerMode::Full));
    let set = intents();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let reply = matcher.respond("", &set, &mut rng).unwrap();
        assert!(set.fallback_responses.contains(&reply.text));
    }
}

#[test]
fn exact_pattern_draws_from_its_intent() {
    let matcher = IntentMatcher::new(normalizer(NormalizerMode::Full));
    let set = intents();
    let mut rng = StdRng::seed_from_u64(5);
    for intent in &set.intents {
        for pattern in &intent.patterns {
            for _ in 0..10 {
                let reply = matcher.respond(pattern, &set, &mut rng).unwrap();
                assert!(
                    intent.responses.contains(&reply.text),
                    "{pattern:?} answered with {:?}",
                    reply.text
                );
            }
        }
    }
}

#[test]
fn scenario_greeting_typo_and_unrelated() {
    let matcher = IntentMatcher::new(normalizer(NormalizerMode::Full));
    let set = IntentSet::new(
        vec![Intent::new("greeting", &["hello", "hi there"], &["Hi!"])],
        vec!["I'm here!".to_string()],
    );
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(matcher.respond("helo", &set, &mut rng).unwrap().text, "Hi!");
    assert_eq!(
        matcher.respond("xyz completely unrelated", &set, &mut rng).unwrap().text,
        "I'm here!"
    );
}

#[test]
fn naive_normalizer_matches_plain_patterns() {
    let matcher = IntentMatcher::new(normalizer(NormalizerMode::Naive));
    let set = intents();
    let mut rng = StdRng::seed_from_u64(8);
    let reply = matcher.respond("  SEE YOU LATER  ", &set, &mut rng).unwrap();
    assert_eq!(reply.source, ReplySource::Intent("goodbye".into()));
}

#[test]
fn replies_vary_across_calls() {
    let matcher = IntentMatcher::new(normalizer(NormalizerMode::Full));
    let set = intents();
    let mut rng = StdRng::seed_from_u64(21);
    let seen: HashSet<String> = (0..100)
        .map(|_| matcher.respond("hello", &set, &mut rng).unwrap().text)
        .collect();
    assert_eq!(seen.len(), 2);
}

// ---------------------------------------------------------------------------
// 3. Preprocessing asymmetry
// ---------------------------------------------------------------------------

/// Corpus retrieval works on the raw query while intent matching normalizes
/// first. "Running" is a distinct TF-IDF term from "run", yet normalizes to
/// the same root as the "run" pattern.
#[test]
fn corpus_retrieval_does_not_normalize_but_intents_do() {
    let corpus = vec![
        CorpusRow::new("run tests", "cargo test"),
        CorpusRow::new("running shoes", "sports shop"),
    ];
    assert_eq!(best_answer("Running", &corpus).unwrap(), "sports shop");

    let full = normalizer(NormalizerMode::Full);
    assert_eq!(full.normalize("Running"), full.normalize("run"));
}
