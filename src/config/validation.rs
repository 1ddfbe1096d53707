//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for header names
//! that cannot be used on the wire: invalid tokens and headers the HTTP
//! stack manages itself. Returns a list of [`ValidationError`] values with
//! suggestions where a fix is obvious.

use http::HeaderName;

use super::model::Config;
use crate::error::ValidationError;

/// Headers owned by the HTTP connection layer; overwriting them would
/// corrupt the exchange.
pub const RESERVED_HEADERS: &[&str] = &[
    "connection",
    "content-length",
    "content-type",
    "host",
    "keep-alive",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Validate a single header name. Returns `Ok(())` or a human-readable error.
pub fn validate_header_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        // Falls back to the default header.
        return Ok(());
    }
    let parsed = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| format!("'{name}' is not a valid HTTP header name"))?;
    if RESERVED_HEADERS.contains(&parsed.as_str()) {
        return Err(format!("'{name}' is managed by the HTTP stack"));
    }
    Ok(())
}

fn suggest_header_name(name: &str) -> Option<String> {
    let candidate: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { '-' } else { c })
        .filter(char::is_ascii_graphic)
        .collect();
    (candidate != name && validate_header_name(&candidate).is_ok() && !candidate.is_empty())
        .then(|| format!("did you mean '{candidate}'?"))
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let header_name = &config.correlation.header_name;
    if let Err(message) = validate_header_name(header_name) {
        errors.push(ValidationError {
            field: "correlation.header_name".into(),
            message,
            suggestion: suggest_header_name(header_name),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let correlation = &config.correlation;
    let header = if correlation.header_name.is_empty() {
        crate::middleware::DEFAULT_HEADER_NAME
    } else {
        correlation.header_name.as_str()
    };
    let generator = serde_json::to_value(correlation.generator)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_else(|| format!("{:?}", correlation.generator));

    let lines = [
        format!("  header:    {header}"),
        format!(
            "  response:  {}",
            if correlation.include_in_response {
                "echoed"
            } else {
                "not echoed"
            }
        ),
        format!(
            "  enforced:  {}",
            if correlation.enforce_header {
                "yes (400 when missing)"
            } else {
                "no (generated when missing)"
            }
        ),
        format!("  generator: {generator}"),
    ];

    format!("{path} is valid\n{}", lines.join("\n"))
}
