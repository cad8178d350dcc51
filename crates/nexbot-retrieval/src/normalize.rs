use nexbot_core::{DiagnosticSink, NexbotError, NexbotResult, NormalizerMode};
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::Arc;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// Upper bound on repeated reductions of a single token.
const MAX_REDUCTIONS: usize = 8;

/// Maps a token to its canonical root form.
pub trait RootReducer: Send + Sync {
    /// Reduce a lowercase alphanumeric token.
    fn reduce(&self, token: &str) -> NexbotResult<String>;
}

/// English Snowball (Porter2) stemmer.
pub struct SnowballReducer {
    stemmer: Stemmer,
}

impl SnowballReducer {
    /// Create an English reducer.
    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballReducer {
    fn default() -> Self {
        Self::english()
    }
}

impl RootReducer for SnowballReducer {
    fn reduce(&self, token: &str) -> NexbotResult<String> {
        Ok(self.stemmer.stem(token).into_owned())
    }
}

/// A text normalization strategy.
///
/// Implementations may fail; [`TextNormalizer`] turns failures into the
/// lowercased-trimmed input.
pub trait Normalizer: Send + Sync {
    /// Normalize `text` into whitespace-joined tokens.
    fn try_normalize(&self, text: &str) -> NexbotResult<String>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Word-boundary tokenization, alphanumeric filtering and optional root reduction.
pub struct FullNormalizer {
    reducer: Option<Box<dyn RootReducer>>,
}

impl FullNormalizer {
    /// Full normalizer with the English Snowball reducer.
    pub fn new() -> Self {
        Self::with_reducer(Box::new(SnowballReducer::english()))
    }

    /// Full normalizer with a custom reducer.
    pub fn with_reducer(reducer: Box<dyn RootReducer>) -> Self {
        Self {
            reducer: Some(reducer),
        }
    }

    /// Full normalizer that leaves tokens unreduced.
    pub fn without_reducer() -> Self {
        Self { reducer: None }
    }

    /// Reduce until the token is its own root, so normalizing twice is a no-op.
    fn reduce_to_root(&self, reducer: &dyn RootReducer, token: &str) -> NexbotResult<String> {
        let mut current = token.to_string();
        for _ in 0..MAX_REDUCTIONS {
            let next = reducer.reduce(&current)?;
            if next.is_empty() {
                return Err(NexbotError::Lookup(format!(
                    "root reducer produced an empty root for '{token}'"
                )));
            }
            if next == current {
                break;
            }
            current = next;
        }
        Ok(current)
    }
}

impl Default for FullNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for FullNormalizer {
    fn try_normalize(&self, text: &str) -> NexbotResult<String> {
        let lowered = text.trim().to_lowercase();
        let mut tokens = Vec::new();

        for segment in lowered.split_word_bounds() {
            for piece in without_clitic(segment).split(|c: char| !c.is_alphanumeric()) {
                if piece.is_empty() {
                    continue;
                }
                let token = match &self.reducer {
                    Some(reducer) => self.reduce_to_root(reducer.as_ref(), piece)?,
                    None => piece.to_string(),
                };
                tokens.push(token);
            }
        }

        Ok(tokens.join(" "))
    }

    fn name(&self) -> &'static str {
        "full"
    }
}

/// Host word of a UAX #29 segment with its clitic removed: "don't" -> "do",
/// "what's" -> "what". Clitics are not alphanumeric tokens and are dropped.
fn without_clitic(segment: &str) -> &str {
    for suffix in ["n't", "n\u{2019}t"] {
        if let Some(host) = segment.strip_suffix(suffix) {
            if !host.is_empty() {
                return host;
            }
        }
    }
    match segment.find(['\'', '\u{2019}']) {
        Some(at) => &segment[..at],
        None => segment,
    }
}

/// Lowercase, trim and split on whitespace. Punctuation is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveNormalizer;

impl Normalizer for NaiveNormalizer {
    fn try_normalize(&self, text: &str) -> NexbotResult<String> {
        let lowered = text.trim().to_lowercase();
        Ok(lowered.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}

/// Never-failing front for a [`Normalizer`], selected once at startup.
pub struct TextNormalizer {
    inner: Box<dyn Normalizer>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl TextNormalizer {
    /// Build the normalizer for `mode`.
    pub fn new(mode: NormalizerMode, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        let inner: Box<dyn Normalizer> = match mode {
            NormalizerMode::Full => Box::new(FullNormalizer::new()),
            NormalizerMode::Naive => Box::new(NaiveNormalizer),
        };
        Self::with_normalizer(inner, diagnostics)
    }

    /// Wrap an arbitrary normalizer.
    pub fn with_normalizer(
        inner: Box<dyn Normalizer>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        debug!(normalizer = inner.name(), "text normalizer selected");
        Self { inner, diagnostics }
    }

    /// Name of the underlying strategy.
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// Normalize `text`. On internal failure the failure is recorded and the
    /// lowercased, trimmed input is returned verbatim.
    pub fn normalize(&self, text: &str) -> String {
        match self.inner.try_normalize(text) {
            Ok(normalized) => normalized,
            Err(e) => {
                self.diagnostics.record(&format!("Preprocessing error: {e}"));
                text.trim().to_lowercase()
            }
        }
    }
}
