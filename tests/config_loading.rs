//! Integration tests for config loading across all file formats.

use std::path::Path;

use correlation_id::config::model::Config;
use correlation_id::config::validation::validate;
use correlation_id::config::{load_file, parse_config_str};
use correlation_id::error::CorrelationIdError;
use correlation_id::generator::GeneratorKind;

fn load_example(name: &str) -> String {
    let path = format!("example/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_example_loads_and_validates() {
    let content = load_example("correlation-id.yaml");
    let config = parse_config_str("yaml", &content, "correlation-id.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.correlation.header_name, "X-Correlation-Id");
    assert!(config.correlation.include_in_response);
    assert!(!config.correlation.enforce_header);
}

#[cfg(feature = "yaml")]
#[test]
fn strict_example_enables_enforcement() {
    let content = load_example("strict.yaml");
    let config = parse_config_str("yaml", &content, "strict.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.correlation.header_name, "Correlation-Id");
    assert!(config.correlation.enforce_header);
    assert_eq!(config.correlation.generator, GeneratorKind::UuidSimple);
}

#[cfg(feature = "json")]
#[test]
fn json_example_loads_and_validates() {
    let content = load_example("correlation-id.json");
    let config = parse_config_str("json", &content, "correlation-id.json").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.correlation.header_name, "X-Correlation-Id");
}

#[cfg(feature = "toml")]
#[test]
fn toml_example_loads_and_validates() {
    let content = load_example("correlation-id.toml");
    let config = parse_config_str("toml", &content, "correlation-id.toml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.correlation.header_name, "X-Correlation-Id");
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(result.is_err());
}

#[test]
fn invalid_header_name_fails_validation() {
    let json = r#"{"correlation": {"header_name": "bad header"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();
    let errors = validate(&config).unwrap_err();
    assert_eq!(errors[0].field, "correlation.header_name");
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn load_file_builds_a_working_layer() {
    let config = load_file(Path::new("example/correlation-id.yaml"))
        .await
        .unwrap();
    let layer = config.correlation.to_options().into_layer().unwrap();
    assert_eq!(layer.header_name().as_str(), "x-correlation-id");
}

#[tokio::test]
async fn load_file_reports_missing_file() {
    let err = load_file(Path::new("example/missing.yaml"))
        .await
        .unwrap_err();
    assert!(matches!(err, CorrelationIdError::ConfigFileNotFound { .. }));
}
