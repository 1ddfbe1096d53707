//! Correlation id generation strategies.
//!
//! A generator is any `Fn() -> String` shared behind an [`IdGenerator`].
//! The default, [`uuid_v4`], produces a random hyphenated UUID. Generators
//! are called without arguments and must not fail; a panicking generator
//! is a bug in the embedding application and is left to surface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared, thread-safe correlation id generator.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Random UUID v4 in its hyphenated lowercase form.
#[must_use]
pub fn uuid_v4() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Random UUID v4 without hyphens (32 hex digits).
#[must_use]
pub fn uuid_v4_simple() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[must_use]
pub fn default_generator() -> IdGenerator {
    Arc::new(uuid_v4)
}

/// Named generator strategies selectable from a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    #[default]
    Uuid,
    UuidSimple,
}

impl GeneratorKind {
    #[must_use]
    pub fn build(self) -> IdGenerator {
        match self {
            Self::Uuid => default_generator(),
            Self::UuidSimple => Arc::new(uuid_v4_simple),
        }
    }
}
