//! `rotor validate`: check a configuration file for errors.
//!
//! The file is read through [`sources::load_file`], the same loader `run`
//! uses, and checked on its own: command-line and environment overrides do
//! not apply here.

use std::path::Path;

use serde_json::json;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::{sources, validation};
use crate::error::{RotorError, ValidationError};

pub async fn execute(args: &ValidateArgs) -> Result<(), RotorError> {
    let path = args.config.as_path();
    let config = sources::load_file(path).await?;

    match validation::validate(&config) {
        Ok(()) => {
            print_valid(path, &config, &args.format);
            Ok(())
        }
        Err(errors) => {
            print_invalid(path, &errors, &args.format);
            Err(RotorError::ConfigValidation { errors })
        }
    }
}

fn print_valid(path: &Path, config: &Config, format: &ValidateFormat) {
    match format {
        ValidateFormat::Text => println!(
            "\u{2713} {}",
            validation::format_validation_report(&path.display().to_string(), config)
        ),
        ValidateFormat::Json => println!("{}", valid_json(config)),
    }
}

fn print_invalid(path: &Path, errors: &[ValidationError], format: &ValidateFormat) {
    match format {
        ValidateFormat::Text => {
            eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
            for error in errors {
                eprintln!("{error}");
            }
        }
        ValidateFormat::Json => println!("{}", invalid_json(errors)),
    }
}

fn valid_json(config: &Config) -> serde_json::Value {
    json!({
        "valid": true,
        "backends": config.backend_addresses(),
        "health_check": {
            "interval": config.health_check.interval,
            "timeout": config.health_check.timeout,
        },
    })
}

fn invalid_json(errors: &[ValidationError]) -> serde_json::Value {
    let errors: Vec<_> = errors
        .iter()
        .map(|e| {
            json!({
                "location": e.location,
                "field": e.field,
                "message": e.message,
                "suggestion": e.suggestion,
            })
        })
        .collect();
    json!({ "valid": false, "errors": errors })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(path: &str) -> ValidateArgs {
        ValidateArgs {
            config: PathBuf::from(path),
            format: ValidateFormat::Json,
        }
    }

    #[tokio::test]
    async fn missing_file_is_reported_by_the_loader() {
        let err = execute(&args("does/not/exist/rotor.yaml")).await.unwrap_err();
        assert!(matches!(err, RotorError::ConfigFileNotFound { .. }));
    }

    #[cfg(feature = "yaml")]
    #[tokio::test]
    async fn example_file_is_valid() {
        execute(&args("example/rotor.yaml")).await.unwrap();
    }

    #[test]
    fn json_reports_carry_every_error() {
        let errors = vec![ValidationError {
            location: "backends[0]".into(),
            field: "url".into(),
            message: "'nope' is not a valid URL".into(),
            suggestion: Some("did you mean 'http://nope'?".into()),
        }];
        let report = invalid_json(&errors);
        assert_eq!(report["valid"], false);
        assert_eq!(report["errors"][0]["location"], "backends[0]");
        assert_eq!(report["errors"][0]["suggestion"], "did you mean 'http://nope'?");
    }

    #[test]
    fn json_report_lists_backends() {
        let config = Config {
            backends: vec!["http://a:1".into(), " ".into()],
            ..Config::default()
        };
        let report = valid_json(&config);
        assert_eq!(report["backends"], json!(["http://a:1"]));
        assert_eq!(report["health_check"]["timeout"], 5000);
    }
}
