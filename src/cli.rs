//! Command-line interface for the demo binary, using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum (serve,
//! ping, validate) and their argument structs. Server flags have
//! environment variable equivalents for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::generator::GeneratorKind;
use crate::server::Mount;

#[derive(Parser)]
#[command(
    name = "correlation-id",
    version,
    about = "Correlation id middleware demo server",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        correlation-id serve                         Serve /ping on port 3000\n  \
        correlation-id ping                          Call /ping and show the echoed id\n  \
        correlation-id ping -i abc-123               Call /ping with a chosen id"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the demo server
    Serve(Box<ServeArgs>),

    /// Call /ping on a running instance
    Ping(PingArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        correlation-id serve                                 Defaults, auto-detect config\n  \
        correlation-id serve -c correlation-id.yaml          Specific config file\n  \
        correlation-id serve --enforce-header --pretty       Strict mode, local dev logs\n  \
        correlation-id serve --mount service                 Wrap the handler service directly")]
pub struct ServeArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CORRELATION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// How the middleware is composed into the router
    #[arg(long, env = "CORRELATION_MOUNT", default_value = "router")]
    pub mount: Mount,

    // -- Correlation --
    /// Correlation header name (overrides the config file)
    #[arg(long, env = "CORRELATION_HEADER", help_heading = "Correlation")]
    pub header_name: Option<String>,

    /// Do not echo the correlation id in responses
    #[arg(long, env = "CORRELATION_NO_RESPONSE_HEADER", help_heading = "Correlation")]
    pub no_response_header: bool,

    /// Reject requests without the correlation header (400)
    #[arg(long, env = "CORRELATION_ENFORCE", help_heading = "Correlation")]
    pub enforce_header: bool,

    /// Id generator for requests without the header
    #[arg(long, env = "CORRELATION_GENERATOR", help_heading = "Correlation")]
    pub generator: Option<GeneratorKind>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct PingArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Correlation id to send (omit to let the server generate one)
    #[arg(short = 'i', long)]
    pub correlation_id: Option<String>,

    /// Correlation header name
    #[arg(long, default_value = crate::middleware::DEFAULT_HEADER_NAME)]
    pub header_name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "correlation-id.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "correlation-id",
            "serve",
            "--header-name",
            "X-Correlation-Id",
            "--enforce-header",
            "--mount",
            "route",
            "--generator",
            "uuid-simple",
        ])
        .unwrap();

        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.header_name.as_deref(), Some("X-Correlation-Id"));
        assert!(args.enforce_header);
        assert!(!args.no_response_header);
        assert_eq!(args.mount, Mount::Route);
        assert_eq!(args.generator, Some(GeneratorKind::UuidSimple));
    }

    #[test]
    fn ping_defaults() {
        let cli = Cli::try_parse_from(["correlation-id", "ping"]).unwrap();
        let Some(Commands::Ping(args)) = cli.command else {
            panic!("expected ping");
        };
        assert_eq!(args.url, "http://localhost:3000");
        assert_eq!(args.header_name, "Correlation-Id");
        assert!(args.correlation_id.is_none());
    }
}
