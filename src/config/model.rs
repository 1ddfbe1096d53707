//! Serde data structures for the correlation config file.
//!
//! [`Config`] is the root and currently holds a single
//! [`CorrelationConfig`] section. Both derive `Serialize` and
//! `Deserialize` with `deny_unknown_fields` for strict parsing; every
//! field has a default, so an empty file is a valid config.

use serde::{Deserialize, Serialize};

use crate::generator::GeneratorKind;
use crate::middleware::{CorrelationIdOptions, DEFAULT_HEADER_NAME};

fn default_header_name() -> String {
    DEFAULT_HEADER_NAME.to_string()
}

const fn default_true() -> bool {
    true
}

fn is_default_header_name(v: &str) -> bool {
    v == DEFAULT_HEADER_NAME
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_default_generator(v: &GeneratorKind) -> bool {
    *v == GeneratorKind::default()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub correlation: CorrelationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorrelationConfig {
    #[serde(
        default = "default_header_name",
        skip_serializing_if = "is_default_header_name"
    )]
    pub header_name: String,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub include_in_response: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub enforce_header: bool,

    #[serde(default, skip_serializing_if = "is_default_generator")]
    pub generator: GeneratorKind,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            include_in_response: default_true(),
            enforce_header: false,
            generator: GeneratorKind::default(),
        }
    }
}

impl CorrelationConfig {
    #[must_use]
    pub fn to_options(&self) -> CorrelationIdOptions {
        CorrelationIdOptions {
            header_name: self.header_name.clone(),
            include_in_response: self.include_in_response,
            enforce_header: self.enforce_header,
            id_generator: Some(self.generator.build()),
        }
    }
}
