//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a merged [`Config`] for an empty
//! backend list, malformed or duplicate backend URLs (as reported by
//! [`Registry::new`]), and a missing or zero health-check interval. Returns
//! every problem found as a [`ValidationError`] with a suggestion where one
//! is obvious.

use super::model::Config;
use crate::error::{RotorError, ValidationError};
use crate::pool::Registry;

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let addresses = config.backend_addresses();
    if addresses.is_empty() {
        errors.push(ValidationError {
            location: "(root)".into(),
            field: "backends".into(),
            message: "at least one backend must be defined".into(),
            suggestion: Some("set HOSTS=http://host:port,... or pass --backends".into()),
        });
    } else if let Err(RotorError::ConfigValidation {
        errors: backend_errors,
    }) = Registry::new(&addresses)
    {
        errors.extend(backend_errors);
    }

    match config.health_check.interval {
        None => errors.push(ValidationError {
            location: "(root)".into(),
            field: "health_check.interval".into(),
            message: "health check interval is required".into(),
            suggestion: Some(
                "pass the period in seconds, e.g. 'rotor run 5', or set HEALTH_CHECK_PERIOD".into(),
            ),
        }),
        Some(0) => errors.push(ValidationError {
            location: "(root)".into(),
            field: "health_check.interval".into(),
            message: "interval must be greater than zero".into(),
            suggestion: None,
        }),
        Some(_) => {}
    }

    if config.health_check.timeout == 0 {
        errors.push(ValidationError {
            location: "(root)".into(),
            field: "health_check.timeout".into(),
            message: "probe timeout must be greater than zero".into(),
            suggestion: None,
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
    let addresses = config.backend_addresses();
    let interval = config
        .health_check
        .interval
        .map_or_else(|| "unset".to_string(), |s| format!("{s}s"));

    let mut lines = vec![format!("  {} backends\n", addresses.len())];
    for addr in &addresses {
        lines.push(format!("  -> {addr}"));
    }
    lines.push(format!(
        "\n  health check: every {interval}, timeout {}ms",
        config.health_check.timeout
    ));

    format!("{} is valid\n{}", path, lines.join("\n"))
}
