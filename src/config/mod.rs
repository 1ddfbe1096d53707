//! Config file loading and validation for the demo server.
//!
//! The library itself is configured programmatically through
//! [`CorrelationIdOptions`](crate::middleware::CorrelationIdOptions).
//! This module lets the `serve` command read the same settings from a
//! YAML, JSON or TOML file (each behind its Cargo feature) via
//! [`load_file`], which parses with [`parse_config_str`] and then runs
//! [`validation::validate`].

pub mod model;
pub mod validation;

use std::path::Path;

use crate::error::CorrelationIdError;
use model::Config;

#[cfg(any(feature = "yaml", feature = "json", feature = "toml"))]
fn parse_error<E>(path_display: &str, source: E) -> CorrelationIdError
where
    E: std::error::Error + Send + Sync + 'static,
{
    CorrelationIdError::ConfigParse {
        path: path_display.to_string(),
        source: Box::new(source),
    }
}

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, CorrelationIdError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| parse_error(path_display, e)),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| parse_error(path_display, e)),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| parse_error(path_display, e)),

        other => Err(CorrelationIdError::UnsupportedFormat(other.to_string())),
    }
}

/// Read, parse and validate a config file.
pub async fn load_file(path: &Path) -> Result<Config, CorrelationIdError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CorrelationIdError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CorrelationIdError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        return Err(CorrelationIdError::ConfigValidation { errors });
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = parse_config_str("xml", "<config/>", "config.xml").unwrap_err();
        assert!(matches!(err, CorrelationIdError::UnsupportedFormat(ref ext) if ext == "xml"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_parse_error_names_the_file() {
        let err = parse_config_str("yaml", "correlation: [", "broken.yaml").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = load_file(Path::new("does-not-exist.yaml")).await.unwrap_err();
        assert!(matches!(err, CorrelationIdError::ConfigFileNotFound { .. }));
    }
}
