//! Startup configuration: data model, file loading, CLI overrides, and
//! validation.
//!
//! Configuration is read exactly once. [`resolve`] merges an optional config
//! file with values given on the command line or through the environment
//! (those win), then validates the result so that any problem stops the
//! process before it binds a socket.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::RotorError;
use model::Config;

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backends: Vec<String>,
    pub interval: Option<u64>,
    pub probe_timeout: Option<u64>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if self.backends.iter().any(|b| !b.trim().is_empty()) {
            config.backends = self.backends;
        }
        if let Some(interval) = self.interval {
            config.health_check.interval = Some(interval);
        }
        if let Some(timeout) = self.probe_timeout {
            config.health_check.timeout = timeout;
        }
    }
}

/// Where the file part of the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    CommandLine,
}

impl std::fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::CommandLine => f.write_str("command line"),
        }
    }
}

/// Load, merge, and validate the startup configuration.
///
/// An explicit `file` must exist. Without one, a `rotor.*` file in the
/// working directory is picked up only when no backends were given
/// directly.
pub async fn resolve(
    file: Option<&Path>,
    overrides: Overrides,
) -> Result<(Config, ConfigOrigin), RotorError> {
    let path = match file {
        Some(path) => Some(path.to_path_buf()),
        None if overrides.backends.iter().all(|b| b.trim().is_empty()) => {
            let detected = sources::detect().await;
            if let Some(ref path) = detected {
                tracing::info!(path = %path.display(), "auto-detected config file");
            }
            detected
        }
        None => None,
    };

    let (mut config, origin) = match path {
        Some(path) => (sources::load_file(&path).await?, ConfigOrigin::File(path)),
        None => (Config::default(), ConfigOrigin::CommandLine),
    };

    overrides.apply(&mut config);

    if config.backend_addresses().is_empty() {
        return Err(RotorError::NoBackends {
            hint: "Set HOSTS=http://host:port,... or pass --backends,\n  \
                   or provide a config file with --config."
                .into(),
        });
    }

    validation::validate(&config).map_err(|errors| RotorError::ConfigValidation { errors })?;

    Ok((config, origin))
}
