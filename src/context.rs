//! Per-request correlation id storage.
//!
//! The id lives in the request's [`Extensions`] under a private key type,
//! so no other extension entry can be mistaken for it. Binding goes through
//! [`with_correlation_id`], which derives a new carrier rather than
//! mutating the one it was given. Reading through [`correlation_id`] never
//! fails: a request that never passed through the middleware simply yields
//! `None`.
//!
//! Handlers can also use the [`CorrelationIdExt`] trait or the
//! [`CorrelationId`] axum extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use http::{Extensions, Request};

use crate::error::MissingCorrelationId;

#[derive(Debug, Clone)]
struct CorrelationIdKey(Arc<str>);

/// Return a copy of `extensions` with `id` bound as the correlation id.
#[must_use]
pub fn with_correlation_id(extensions: &Extensions, id: impl Into<Arc<str>>) -> Extensions {
    let mut derived = extensions.clone();
    derived.insert(CorrelationIdKey(id.into()));
    derived
}

/// The correlation id bound in `extensions`, if any.
#[must_use]
pub fn correlation_id(extensions: &Extensions) -> Option<&str> {
    extensions
        .get::<CorrelationIdKey>()
        .map(|key| key.0.as_ref())
}

pub trait CorrelationIdExt {
    fn correlation_id(&self) -> Option<&str>;
}

impl<B> CorrelationIdExt for Request<B> {
    fn correlation_id(&self) -> Option<&str> {
        correlation_id(self.extensions())
    }
}

impl CorrelationIdExt for Parts {
    fn correlation_id(&self) -> Option<&str> {
        correlation_id(&self.extensions)
    }
}

/// Extractor for the correlation id of the current request.
///
/// Rejects with `500` when the correlation layer is not installed on the
/// route. Use `Option<CorrelationId>` to get `None` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn extract(parts: &Parts) -> Option<CorrelationId> {
    parts
        .extensions
        .get::<CorrelationIdKey>()
        .map(|key| CorrelationId(Arc::clone(&key.0)))
}

impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = MissingCorrelationId;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract(parts).ok_or(MissingCorrelationId)
    }
}

impl<S> OptionalFromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(extract(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_attached_id() {
        let extensions = with_correlation_id(&Extensions::new(), "X");
        assert_eq!(correlation_id(&extensions), Some("X"));
    }

    #[test]
    fn absent_id_reads_as_none() {
        assert_eq!(correlation_id(&Extensions::new()), None);
    }

    #[test]
    fn attaching_leaves_source_untouched() {
        let source = Extensions::new();
        let derived = with_correlation_id(&source, "abc-123");

        assert_eq!(correlation_id(&source), None);
        assert_eq!(correlation_id(&derived), Some("abc-123"));
    }

    #[test]
    fn rebinding_shadows_previous_id() {
        let first = with_correlation_id(&Extensions::new(), "first");
        let second = with_correlation_id(&first, "second");

        assert_eq!(correlation_id(&first), Some("first"));
        assert_eq!(correlation_id(&second), Some("second"));
    }

    #[test]
    fn unrelated_string_extension_is_ignored() {
        let mut extensions = Extensions::new();
        extensions.insert(String::from("CorrelationId"));
        extensions.insert(Arc::<str>::from("not-a-correlation-id"));

        assert_eq!(correlation_id(&extensions), None);
    }

    #[test]
    fn derived_carrier_keeps_other_entries() {
        let mut source = Extensions::new();
        source.insert(42_u32);

        let derived = with_correlation_id(&source, "id");
        assert_eq!(derived.get::<u32>(), Some(&42));
    }

    #[test]
    fn request_and_parts_expose_id() {
        let mut req = Request::new(());
        *req.extensions_mut() = with_correlation_id(req.extensions(), "req-id");
        assert_eq!(req.correlation_id(), Some("req-id"));

        let (parts, ()) = req.into_parts();
        assert_eq!(parts.correlation_id(), Some("req-id"));
    }

    #[tokio::test]
    async fn extractor_rejects_without_layer() {
        let (mut parts, ()) = Request::new(()).into_parts();
        let result =
            <CorrelationId as FromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());

        let optional =
            <Option<CorrelationId> as FromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert!(optional.is_none());
    }

    #[tokio::test]
    async fn extractor_returns_bound_id() {
        let (mut parts, ()) = Request::new(()).into_parts();
        parts.extensions = with_correlation_id(&parts.extensions, "bound");

        let id = <CorrelationId as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(id.as_str(), "bound");
        assert_eq!(id.to_string(), "bound");
    }
}
