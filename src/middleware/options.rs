//! Caller-facing middleware configuration.

use std::sync::Arc;

use crate::error::CorrelationIdError;
use crate::generator::{self, IdGenerator};

use super::CorrelationIdLayer;

/// Header read from requests and written to responses when no name is set.
pub const DEFAULT_HEADER_NAME: &str = "Correlation-Id";

/// Settings for [`CorrelationIdLayer`].
///
/// Every field may be changed freely before the options are turned into a
/// layer. The layer keeps its own snapshot; later edits to these options
/// do not affect it.
#[derive(Clone)]
pub struct CorrelationIdOptions {
    /// Request and response header name. Empty means [`DEFAULT_HEADER_NAME`].
    pub header_name: String,
    /// Echo the effective id in the response header.
    pub include_in_response: bool,
    /// Reject requests without the header with `400 Bad Request`.
    pub enforce_header: bool,
    /// Id source for requests without the header. `None` falls back to
    /// [`generator::uuid_v4`].
    pub id_generator: Option<IdGenerator>,
}

impl Default for CorrelationIdOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CorrelationIdOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationIdOptions")
            .field("header_name", &self.header_name)
            .field("include_in_response", &self.include_in_response)
            .field("enforce_header", &self.enforce_header)
            .field("id_generator", &self.id_generator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl CorrelationIdOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header_name: DEFAULT_HEADER_NAME.to_string(),
            include_in_response: true,
            enforce_header: false,
            id_generator: Some(generator::default_generator()),
        }
    }

    #[must_use]
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    #[must_use]
    pub fn with_include_in_response(mut self, include: bool) -> Self {
        self.include_in_response = include;
        self
    }

    #[must_use]
    pub fn with_enforce_header(mut self, enforce: bool) -> Self {
        self.enforce_header = enforce;
        self
    }

    #[must_use]
    pub fn with_id_generator<F>(mut self, generate: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.id_generator = Some(Arc::new(generate));
        self
    }

    /// The header name actually used on the wire.
    #[must_use]
    pub fn effective_header_name(&self) -> &str {
        if self.header_name.is_empty() {
            DEFAULT_HEADER_NAME
        } else {
            &self.header_name
        }
    }

    pub(crate) fn effective_generator(&self) -> IdGenerator {
        self.id_generator
            .clone()
            .unwrap_or_else(generator::default_generator)
    }

    /// Build the layer, snapshotting the current settings.
    pub fn into_layer(self) -> Result<CorrelationIdLayer, CorrelationIdError> {
        CorrelationIdLayer::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = CorrelationIdOptions::new();
        assert_eq!(options.header_name, "Correlation-Id");
        assert!(options.include_in_response);
        assert!(!options.enforce_header);
        assert!(options.id_generator.is_some());
    }

    #[test]
    fn empty_header_name_falls_back_to_default() {
        let options = CorrelationIdOptions::new().with_header_name("");
        assert_eq!(options.effective_header_name(), DEFAULT_HEADER_NAME);
    }

    #[test]
    fn custom_header_name_is_used_verbatim() {
        let options = CorrelationIdOptions::new().with_header_name("X-Correlation-Id");
        assert_eq!(options.effective_header_name(), "X-Correlation-Id");
    }

    #[test]
    fn cleared_generator_falls_back_to_uuid() {
        let mut options = CorrelationIdOptions::new();
        options.id_generator = None;

        let id = options.effective_generator()();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn debug_hides_generator() {
        let rendered = format!("{:?}", CorrelationIdOptions::new());
        assert!(rendered.contains("<fn>"));
    }
}
