//! Correlation id middleware for `tower` services.
//!
//! [`CorrelationIdLayer`] wraps an inner service in a
//! [`CorrelationIdService`]. For every request the service:
//!
//! 1. reads the configured header (case-insensitive, first value);
//! 2. uses a non-empty value byte for byte, otherwise rejects the request with
//!    `400 Bad Request` when the header is enforced, otherwise asks the
//!    configured generator for a fresh id;
//! 3. binds the id into a derived copy of the request extensions via
//!    [`with_correlation_id`](crate::context::with_correlation_id);
//! 4. calls the inner service, echoing the id in the response header when
//!    enabled.
//!
//! Header bytes are decoded as Latin-1: every byte becomes the `char` with
//! the same value. The id a handler reads therefore maps back to the exact
//! bytes received, and the echo is written from that same id.
//!
//! When the current span declares a `correlation_id` field (for example
//! a `TraceLayer` span created with `correlation_id = field::Empty`), the
//! resolved id is recorded on it.
//!
//! The layer holds an immutable snapshot of its [`CorrelationIdOptions`],
//! shared by every service it produces, so it is safe to use from any
//! number of concurrent requests.

mod options;

pub use options::{CorrelationIdOptions, DEFAULT_HEADER_NAME};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderName, HeaderValue, Request, Response, StatusCode};
use tower::{Layer, Service};

use crate::context;
use crate::error::CorrelationIdError;
use crate::generator::{self, IdGenerator};

pub type ResponseFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

struct Policy {
    header: HeaderName,
    // Spelling as configured, used in the rejection message.
    header_label: String,
    include_in_response: bool,
    enforce_header: bool,
    generator: IdGenerator,
}

impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policy")
            .field("header", &self.header)
            .field("include_in_response", &self.include_in_response)
            .field("enforce_header", &self.enforce_header)
            .finish_non_exhaustive()
    }
}

/// Header bytes mapped one-to-one onto `U+0000..=U+00FF`, so the bound id
/// carries exactly the bytes the client sent.
fn decode_id(value: &HeaderValue) -> String {
    value.as_bytes().iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`decode_id`]. `None` for ids with characters above `U+00FF`.
fn encode_id(id: &str) -> Option<Vec<u8>> {
    id.chars().map(|c| u8::try_from(c).ok()).collect()
}

impl Policy {
    fn echo_value(&self, id: &str) -> Option<HeaderValue> {
        let value = encode_id(id).and_then(|bytes| HeaderValue::from_bytes(&bytes).ok());
        if value.is_none() {
            tracing::error!(
                correlation_id = %id,
                header = %self.header_label,
                "correlation id is not a valid header value, not echoing it"
            );
        }
        value
    }

    fn missing_header_response<B: From<String>>(&self) -> Response<B> {
        let message = format!("{} header is required.\n", self.header_label);
        let mut response = Response::new(B::from(message));
        *response.status_mut() = StatusCode::BAD_REQUEST;
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        response
    }
}

/// Layer that applies [`CorrelationIdService`].
#[derive(Debug, Clone)]
pub struct CorrelationIdLayer {
    policy: Arc<Policy>,
}

impl Default for CorrelationIdLayer {
    fn default() -> Self {
        Self {
            policy: Arc::new(Policy {
                header: HeaderName::from_static("correlation-id"),
                header_label: DEFAULT_HEADER_NAME.to_string(),
                include_in_response: true,
                enforce_header: false,
                generator: generator::default_generator(),
            }),
        }
    }
}

impl CorrelationIdLayer {
    /// Snapshot `options` into a layer.
    ///
    /// Fails when the effective header name is not a valid HTTP header name.
    pub fn new(options: CorrelationIdOptions) -> Result<Self, CorrelationIdError> {
        let label = options.effective_header_name().to_string();
        let header = HeaderName::from_bytes(label.as_bytes()).map_err(|source| {
            CorrelationIdError::InvalidHeaderName {
                name: label.clone(),
                source,
            }
        })?;

        Ok(Self {
            policy: Arc::new(Policy {
                header,
                header_label: label,
                include_in_response: options.include_in_response,
                enforce_header: options.enforce_header,
                generator: options.effective_generator(),
            }),
        })
    }

    #[must_use]
    pub fn header_name(&self) -> &HeaderName {
        &self.policy.header
    }
}

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdService {
            inner,
            policy: Arc::clone(&self.policy),
        }
    }
}

/// Middleware that resolves, binds and echoes the correlation id.
///
/// Built by [`CorrelationIdLayer`].
#[derive(Debug, Clone)]
pub struct CorrelationIdService<S> {
    inner: S,
    policy: Arc<Policy>,
}

impl<S> CorrelationIdService<S> {
    #[must_use]
    pub const fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CorrelationIdService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: From<String> + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = ResponseFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let policy = &self.policy;
        let (mut parts, body) = req.into_parts();

        let supplied = parts
            .headers
            .get(&policy.header)
            .filter(|value| !value.is_empty())
            .cloned();

        let id = match supplied {
            Some(ref value) => decode_id(value),
            None if policy.enforce_header => {
                tracing::warn!(
                    header = %policy.header_label,
                    method = %parts.method,
                    path = %parts.uri.path(),
                    "rejecting request without correlation id"
                );
                let response: Response<ResBody> = policy.missing_header_response();
                return Box::pin(std::future::ready(Ok::<_, S::Error>(response)));
            }
            None => (policy.generator)(),
        };

        tracing::Span::current().record("correlation_id", id.as_str());
        tracing::debug!(
            correlation_id = %id,
            generated = supplied.is_none(),
            "correlation id resolved"
        );

        let echo = if policy.include_in_response {
            policy.echo_value(&id)
        } else {
            None
        };
        let header = policy.header.clone();

        parts.extensions = context::with_correlation_id(&parts.extensions, id);
        let future = self.inner.call(Request::from_parts(parts, body));

        Box::pin(async move {
            let mut response = future.await?;
            if let Some(value) = echo {
                // A handler that set the header itself keeps its value.
                response.headers_mut().entry(header).or_insert(value);
            }
            Ok(response)
        })
    }
}
