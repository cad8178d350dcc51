use thiserror::Error;

/// A convenience `Result` alias using [`NexbotError`].
pub type NexbotResult<T> = Result<T, NexbotError>;

/// Top-level error type for Nexbot.
///
/// Errors never cross the host call surface; the host crate turns them into
/// answer strings or degraded replies and records the detail in the diagnostic log.
#[derive(Error, Debug)]
pub enum NexbotError {
    /// A corpus or configuration file does not exist.
    #[error("Resource not found: {path}")]
    ResourceMissing {
        /// Path that was looked up.
        path: String,
    },

    /// A resource exists but holds no usable records.
    #[error("Resource is empty: {0}")]
    ResourceEmpty(String),

    /// A resource could not be parsed.
    #[error("Malformed resource: {0}")]
    ResourceMalformed(String),

    /// A tabular resource lacks a required column.
    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    /// An unexpected failure while normalizing, scoring or selecting.
    #[error("Lookup failure: {0}")]
    Lookup(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`NexbotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The corpus or configuration file is absent.
    ResourceMissing,
    /// The resource has zero rows or zero intents.
    ResourceEmpty,
    /// The resource is unparseable or lacks a required field.
    ResourceMalformed,
    /// Unexpected failure during normalize/score/select.
    LookupFailure,
}

impl NexbotError {
    /// Maps this error onto the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            NexbotError::ResourceMissing { .. } => FailureKind::ResourceMissing,
            NexbotError::ResourceEmpty(_) => FailureKind::ResourceEmpty,
            NexbotError::ResourceMalformed(_)
            | NexbotError::MissingColumn(_)
            | NexbotError::Config(_)
            | NexbotError::Json(_)
            | NexbotError::Csv(_)
            | NexbotError::Toml(_) => FailureKind::ResourceMalformed,
            NexbotError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                FailureKind::ResourceMissing
            }
            NexbotError::Lookup(_) | NexbotError::Io(_) => FailureKind::LookupFailure,
        }
    }

    /// Shorthand for a [`NexbotError::ResourceMissing`] at `path`.
    pub fn missing(path: impl AsRef<std::path::Path>) -> Self {
        NexbotError::ResourceMissing {
            path: path.as_ref().display().to_string(),
        }
    }
}
