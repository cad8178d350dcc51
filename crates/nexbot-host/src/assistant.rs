use crate::loader::{load_corpus, load_intents};
use nexbot_core::{
    CorpusRow, DiagnosticSink, FileDiagnosticLog, IntentSet, NexbotConfig, NexbotError,
    NexbotResult, NormalizerMode, NullDiagnostics, APOLOGY_RESPONSE,
};
use nexbot_retrieval::{
    best_answer, describe_failure, IntentMatcher, Normalizer, Reply, TextNormalizer,
};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Reported by [`Assistant::self_test`] when the corpus is usable.
pub const SELF_TEST_OK: &str = "QA system is working correctly";

/// The context object a host builds once and passes to every call.
///
/// Corpus and intents are read-only after construction, so one instance can
/// serve concurrent callers. A failed load never prevents construction:
///
/// - a corpus that cannot be loaded is remembered, and every
///   [`get_answer`](Self::get_answer) returns the matching error text;
/// - intents that cannot be loaded are replaced by [`IntentSet::builtin`].
pub struct Assistant {
    corpus: NexbotResult<Vec<CorpusRow>>,
    intents: IntentSet,
    matcher: IntentMatcher,
    diagnostics: Arc<dyn DiagnosticSink>,
    rng: Mutex<StdRng>,
}

impl Assistant {
    /// Start building an assistant from in-memory data.
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::default()
    }

    /// Load everything named by `config`. Failures are recorded in the
    /// diagnostic log at `config.diagnostics_path` and degrade to safe defaults.
    pub fn from_config(config: &NexbotConfig) -> Self {
        let diagnostics: Arc<dyn DiagnosticSink> =
            Arc::new(FileDiagnosticLog::new(&config.diagnostics_path));
        Self::load(config, diagnostics)
    }

    /// Read the configuration at `path` (or use the defaults when `None` or
    /// absent) and load everything it names.
    pub fn from_config_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::from_config(&NexbotConfig::default());
        };
        match NexbotConfig::load(path) {
            Ok(config) => Self::from_config(&config),
            Err(NexbotError::ResourceMissing { .. }) => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::from_config(&defaults_beside(path))
            }
            Err(e) => {
                let config = defaults_beside(path);
                let diagnostics: Arc<dyn DiagnosticSink> =
                    Arc::new(FileDiagnosticLog::new(&config.diagnostics_path));
                diagnostics.record(&format!("Failed to load config {}: {e}", path.display()));
                Self::load(&config, diagnostics)
            }
        }
    }

    fn load(config: &NexbotConfig, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        let corpus = load_corpus(&config.corpus_path);
        if let Err(e) = &corpus {
            diagnostics.record(&format!(
                "Failed to load {}: {e}",
                config.corpus_path.display()
            ));
        }

        let intents = match load_intents(&config.intents_path, &config.fallback_responses) {
            Ok(intents) => intents,
            Err(e) => {
                diagnostics.record(&format!(
                    "Failed to load {}: {e}",
                    config.intents_path.display()
                ));
                IntentSet::builtin(config.fallback_responses.clone())
            }
        };

        Self::builder()
            .corpus_result(corpus)
            .intents(intents)
            .normalizer_mode(config.normalizer)
            .threshold(config.match_threshold)
            .diagnostics(diagnostics)
            .build()
    }

    /// Answer of the corpus row closest to `query`, or a human-readable error
    /// message in its place. Never fails.
    pub fn get_answer(&self, query: &str) -> String {
        match self.answer(query) {
            Ok(answer) => answer.to_string(),
            Err(e) => {
                if self.corpus.is_ok() {
                    self.diagnostics
                        .record(&format!("Error processing question: {e}"));
                }
                describe_failure(&e)
            }
        }
    }

    /// Typed form of [`get_answer`](Self::get_answer).
    pub fn answer(&self, query: &str) -> NexbotResult<&str> {
        match &self.corpus {
            Ok(rows) => best_answer(query, rows),
            Err(e) => Err(replay(e)),
        }
    }

    /// Conversational reply for `query`. Internal failures degrade to a fixed
    /// apology. Never fails.
    pub fn get_response(&self, query: &str) -> String {
        match self.respond(query) {
            Ok(reply) => reply.text,
            Err(e) => {
                self.diagnostics
                    .record(&format!("Error getting response: {e}"));
                APOLOGY_RESPONSE.to_string()
            }
        }
    }

    /// Typed form of [`get_response`](Self::get_response).
    pub fn respond(&self, query: &str) -> NexbotResult<Reply> {
        // The shared source only seeds a per-call generator, keeping the lock short.
        let mut rng = StdRng::seed_from_u64(self.rng.lock().gen());
        self.matcher.respond(query, &self.intents, &mut rng)
    }

    /// Whether the corpus is usable.
    pub fn self_test(&self) -> String {
        match &self.corpus {
            Ok(_) => SELF_TEST_OK.to_string(),
            Err(e) => format!("Test failed: {}", describe_failure(e)),
        }
    }

    /// Loaded corpus rows, or the load failure.
    pub fn corpus(&self) -> Result<&[CorpusRow], &NexbotError> {
        self.corpus.as_deref()
    }

    /// Intents in use (possibly the built-in set).
    pub fn intents(&self) -> &IntentSet {
        &self.intents
    }
}

/// Default configuration with paths rooted next to `config_path`.
fn defaults_beside(config_path: &Path) -> NexbotConfig {
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    NexbotConfig::default().resolved_against(base)
}

/// Re-create a stored load failure for a new caller. The variants carrying
/// foreign error types collapse to their rendered text.
fn replay(error: &NexbotError) -> NexbotError {
    match error {
        NexbotError::ResourceMissing { path } => NexbotError::ResourceMissing {
            path: path.clone(),
        },
        NexbotError::ResourceEmpty(m) => NexbotError::ResourceEmpty(m.clone()),
        NexbotError::ResourceMalformed(m) => NexbotError::ResourceMalformed(m.clone()),
        NexbotError::MissingColumn(c) => NexbotError::MissingColumn(c.clone()),
        NexbotError::Csv(e) => NexbotError::ResourceMalformed(e.to_string()),
        other => NexbotError::Lookup(other.to_string()),
    }
}

/// Builder for [`Assistant`], used by hosts with in-memory data and by tests.
pub struct AssistantBuilder {
    corpus: NexbotResult<Vec<CorpusRow>>,
    intents: IntentSet,
    normalizer: Option<Box<dyn Normalizer>>,
    mode: NormalizerMode,
    threshold: f64,
    diagnostics: Arc<dyn DiagnosticSink>,
    seed: Option<u64>,
}

impl Default for AssistantBuilder {
    fn default() -> Self {
        Self {
            corpus: Err(NexbotError::ResourceEmpty("no corpus configured".to_string())),
            intents: IntentSet::default(),
            normalizer: None,
            mode: NormalizerMode::default(),
            threshold: nexbot_retrieval::intent::DEFAULT_THRESHOLD,
            diagnostics: Arc::new(NullDiagnostics),
            seed: None,
        }
    }
}

impl AssistantBuilder {
    /// Use these corpus rows.
    pub fn corpus(self, rows: Vec<CorpusRow>) -> Self {
        self.corpus_result(Ok(rows))
    }

    /// Use the outcome of a corpus load, successful or not.
    pub fn corpus_result(mut self, corpus: NexbotResult<Vec<CorpusRow>>) -> Self {
        self.corpus = corpus;
        self
    }

    /// Use this intent set.
    pub fn intents(mut self, intents: IntentSet) -> Self {
        self.intents = intents;
        self
    }

    /// Select the built-in normalizer for `mode`.
    pub fn normalizer_mode(mut self, mode: NormalizerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use a custom normalizer instead of a built-in one.
    pub fn normalizer(mut self, normalizer: Box<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Minimum pattern similarity for an intent to match.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Where internal failures are recorded.
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Seed the random source for reproducible replies.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Finish construction.
    pub fn build(self) -> Assistant {
        let normalizer = match self.normalizer {
            Some(custom) => TextNormalizer::with_normalizer(custom, self.diagnostics.clone()),
            None => TextNormalizer::new(self.mode, self.diagnostics.clone()),
        };
        let matcher = IntentMatcher::new(Arc::new(normalizer)).with_threshold(self.threshold);
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        match &self.corpus {
            Ok(rows) => info!(
                rows = rows.len(),
                intents = self.intents.intents.len(),
                "assistant ready"
            ),
            Err(e) => warn!(
                error = %e,
                intents = self.intents.intents.len(),
                "assistant ready without corpus"
            ),
        }

        Assistant {
            corpus: self.corpus,
            intents: self.intents,
            matcher,
            diagnostics: self.diagnostics,
            rng: Mutex::new(rng),
        }
    }
}
