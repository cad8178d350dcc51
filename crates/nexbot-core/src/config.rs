use crate::{default_fallback_responses, NexbotError, NexbotResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which text normalizer a process runs with. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerMode {
    /// Unicode word segmentation, alphanumeric filter and root-form reduction.
    #[default]
    Full,
    /// Lowercase and split on whitespace only.
    Naive,
}

/// Configuration of a Nexbot process, usually read from `nexbot.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NexbotConfig {
    /// CSV file with `question` and `answer` columns.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
    /// JSON intent document.
    #[serde(default = "default_intents_path")]
    pub intents_path: PathBuf,
    /// Append-only log receiving internal failures.
    #[serde(default = "default_diagnostics_path")]
    pub diagnostics_path: PathBuf,
    /// Text normalizer used by intent matching.
    #[serde(default)]
    pub normalizer: NormalizerMode,
    /// Minimum sequence ratio for a pattern to count as a match.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    /// Replies for blank or unmatched queries. Must not be empty.
    #[serde(default = "default_fallback_responses")]
    pub fallback_responses: Vec<String>,
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("qa_dataset.csv")
}
fn default_intents_path() -> PathBuf {
    PathBuf::from("intent.json")
}
fn default_diagnostics_path() -> PathBuf {
    PathBuf::from("chatbot_error.log")
}
fn default_match_threshold() -> f64 {
    0.5
}

impl Default for NexbotConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            intents_path: default_intents_path(),
            diagnostics_path: default_diagnostics_path(),
            normalizer: NormalizerMode::default(),
            match_threshold: default_match_threshold(),
            fallback_responses: default_fallback_responses(),
        }
    }
}

impl NexbotConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> NexbotResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file. Relative paths inside it are
    /// resolved against the directory holding the file.
    pub fn load(path: &Path) -> NexbotResult<Self> {
        if !path.exists() {
            return Err(NexbotError::missing(path));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved_against(base))
    }

    /// Rewrite every relative path so it is rooted at `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        for path in [
            &mut self.corpus_path,
            &mut self.intents_path,
            &mut self.diagnostics_path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    fn validate(&self) -> NexbotResult<()> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(NexbotError::Config(format!(
                "match_threshold must be within [0, 1], got {}",
                self.match_threshold
            )));
        }
        if self.fallback_responses.is_empty() {
            return Err(NexbotError::Config(
                "fallback_responses must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
