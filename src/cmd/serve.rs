//! `correlation-id serve` — start the demo server.
//!
//! Loads the correlation settings from a config file (explicit or
//! auto-detected), applies CLI overrides, builds the layer and serves
//! `GET /ping` until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::ServeArgs;
use crate::config::model::Config;
use crate::config::{self, validation};
use crate::error::CorrelationIdError;
use crate::logging;
use crate::server;

pub async fn execute(args: ServeArgs) -> Result<(), CorrelationIdError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let mut config = resolve_config(args.config.as_deref()).await?;
    apply_overrides(&mut config, &args);

    if let Err(errors) = validation::validate(&config) {
        return Err(CorrelationIdError::ConfigValidation { errors });
    }

    let layer = config.correlation.to_options().into_layer()?;
    let header = layer.header_name().clone();
    let router = server::build_router(layer, args.mount, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        header = %header,
        include_in_response = config.correlation.include_in_response,
        enforce_header = config.correlation.enforce_header,
        mount = ?args.mount,
        "correlation-id demo server started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("correlation-id demo server stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    let correlation = &mut config.correlation;
    if let Some(ref name) = args.header_name {
        correlation.header_name.clone_from(name);
    }
    if args.no_response_header {
        correlation.include_in_response = false;
    }
    if args.enforce_header {
        correlation.enforce_header = true;
    }
    if let Some(generator) = args.generator {
        correlation.generator = generator;
    }
}

async fn resolve_config(explicit: Option<&Path>) -> Result<Config, CorrelationIdError> {
    if let Some(path) = explicit {
        return config::load_file(path).await;
    }

    // Auto-detect in current directory
    let candidates = [
        "correlation-id.yaml",
        "correlation-id.yml",
        "correlation-id.json",
        "correlation-id.toml",
    ];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return config::load_file(&path).await;
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}
