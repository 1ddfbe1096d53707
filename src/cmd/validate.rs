//! `correlation-id validate`: check a config file without serving.
//!
//! A file passes when it parses, its settings validate and they build a
//! working [`CorrelationIdLayer`](crate::CorrelationIdLayer). For a passing
//! file the report also shows the header as it appears on the wire and an
//! id drawn from the configured generator.

use serde::Serialize;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::{Config, CorrelationConfig};
use crate::config::{parse_config_str, validation};
use crate::error::{CorrelationIdError, ValidationError};

#[derive(Debug, Serialize)]
pub struct Verdict {
    pub path: String,
    pub valid: bool,
    pub correlation: CorrelationConfig,
    /// Lowercase wire form of the header the layer matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wire_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

/// Validate an already parsed config and try building the layer from it.
#[must_use]
pub fn check(path: &str, config: Config) -> Verdict {
    let mut errors = validation::validate(&config).err().unwrap_or_default();
    let mut wire_header = None;
    let mut sample_id = None;

    if errors.is_empty() {
        match config.correlation.to_options().into_layer() {
            Ok(layer) => {
                wire_header = Some(layer.header_name().to_string());
                sample_id = Some(config.correlation.generator.build()());
            }
            Err(e) => errors.push(ValidationError {
                field: "correlation.header_name".into(),
                message: e.to_string(),
                suggestion: None,
            }),
        }
    }

    Verdict {
        path: path.to_string(),
        valid: errors.is_empty(),
        correlation: config.correlation,
        wire_header,
        sample_id,
        errors,
    }
}

fn render_text(verdict: &Verdict, config: &Config) {
    if verdict.valid {
        println!(
            "\u{2713} {}",
            validation::format_validation_report(&verdict.path, config)
        );
        if let Some(ref wire) = verdict.wire_header {
            println!("  wire:      {wire}");
        }
        if let Some(ref sample) = verdict.sample_id {
            println!("  sample:    {sample}");
        }
    } else {
        eprintln!("\u{2717} {} has {} errors\n", verdict.path, verdict.errors.len());
        for error in &verdict.errors {
            eprintln!("{error}");
        }
    }
}

pub fn execute(args: &ValidateArgs) -> Result<(), CorrelationIdError> {
    let path = &args.config;
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CorrelationIdError::ConfigFileNotFound { path: path.clone() }
        } else {
            CorrelationIdError::Io(e)
        }
    })?;

    let display = path.display().to_string();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &display)?;
    let verdict = check(&display, config.clone());

    match args.format {
        ValidateFormat::Text => render_text(&verdict, &config),
        ValidateFormat::Json => {
            let json = serde_json::to_string_pretty(&verdict).map_err(std::io::Error::from)?;
            println!("{json}");
        }
    }

    if verdict.valid {
        Ok(())
    } else {
        Err(CorrelationIdError::ConfigValidation {
            errors: verdict.errors,
        })
    }
}
