//! Embeddable Nexbot assistant for host applications.
//!
//! A host builds one [`Assistant`] at startup, either from a `nexbot.toml`
//! file or from in-memory data through [`AssistantBuilder`], and keeps it for
//! the lifetime of the process. Native hosts reach the same object through the
//! C ABI in [`ffi`].
//!
//! # Main types
//!
//! - [`Assistant`] — Loaded corpus and intents plus the two lookup operations.
//! - [`AssistantBuilder`] — Construction from in-memory data with injectable seed and normalizer.

/// The assistant context object.
pub mod assistant;
/// C ABI exports.
pub mod ffi;
/// CSV corpus and JSON intent loaders.
pub mod loader;

pub use assistant::{Assistant, AssistantBuilder, SELF_TEST_OK};
pub use loader::{load_corpus, load_intents, parse_corpus, parse_intents};
