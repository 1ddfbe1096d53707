//! Demo Axum server around the correlation middleware.
//!
//! [`build_router`] exposes `GET /ping`, which answers with the
//! correlation id it reads from the request context. [`Mount`] selects
//! how the layer is composed: over the whole router, over matched routes
//! only, or around a bare handler service. [`shutdown_signal`] handles
//! SIGTERM / Ctrl+C.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use clap::ValueEnum;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::context::{CorrelationId, CorrelationIdExt};
use crate::middleware::CorrelationIdLayer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mount {
    /// `Router::layer`: every request, including unmatched paths
    #[default]
    Router,
    /// `Router::route_layer`: matched routes only
    Route,
    /// The layer wraps the `/ping` handler service directly
    Service,
}

pub async fn ping_handler(correlation_id: Option<CorrelationId>) -> String {
    let id = correlation_id.map(|id| id.to_string()).unwrap_or_default();
    tracing::info!(correlation_id = %id, "ping");
    id
}

async fn ping_service(req: Request) -> Result<Response, Infallible> {
    let id = req.correlation_id().unwrap_or_default().to_owned();
    tracing::info!(correlation_id = %id, "ping");
    Ok(Response::new(Body::from(id)))
}

pub fn build_router(layer: CorrelationIdLayer, mount: Mount, max_body: usize) -> Router {
    // The correlation layer fills in `correlation_id` once it has resolved it.
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        tracing::info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            correlation_id = tracing::field::Empty,
        )
    });

    let router = match mount {
        Mount::Router => Router::new().route("/ping", get(ping_handler)).layer(layer),
        Mount::Route => Router::new()
            .route("/ping", get(ping_handler))
            .route_layer(layer),
        Mount::Service => Router::new().route_service(
            "/ping",
            ServiceBuilder::new().layer(layer).service_fn(ping_service),
        ),
    };

    router.layer(
        ServiceBuilder::new()
            .layer(trace)
            .layer(RequestBodyLimitLayer::new(max_body)),
    )
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
