//! The fixed, ordered list of every configured backend.

use std::sync::Arc;

use super::backend::Backend;
use crate::config::model::Config;
use crate::error::{RotorError, ValidationError};

fn scheme_suggestion(url: &str) -> Option<String> {
    let trimmed = url.trim();
    (!trimmed.is_empty() && !trimmed.contains("://"))
        .then(|| format!("did you mean 'http://{trimmed}'?"))
}

/// All configured backends, in configuration order.
///
/// Built once at startup and never mutated; clones share the same list.
#[derive(Debug, Clone)]
pub struct Registry {
    backends: Arc<[Backend]>,
}

impl Registry {
    /// Build the registry from raw backend addresses.
    ///
    /// Every address is parsed and all problems are reported together.
    /// Duplicates and an empty list are rejected.
    pub fn new<S: AsRef<str>>(addresses: &[S]) -> Result<Self, RotorError> {
        if addresses.is_empty() {
            return Err(RotorError::NoBackends {
                hint: "Set HOSTS=http://host:port,... or pass --backends.".into(),
            });
        }

        let mut backends: Vec<Backend> = Vec::with_capacity(addresses.len());
        let mut errors = Vec::new();

        for (i, raw) in addresses.iter().enumerate() {
            match Backend::parse(raw.as_ref()) {
                Ok(backend) if backends.contains(&backend) => errors.push(ValidationError {
                    location: format!("backends[{i}]"),
                    field: "url".into(),
                    message: format!("duplicate backend '{backend}'"),
                    suggestion: None,
                }),
                Ok(backend) => backends.push(backend),
                Err(e) => errors.push(ValidationError {
                    location: format!("backends[{i}]"),
                    field: "url".into(),
                    message: e.to_string(),
                    suggestion: scheme_suggestion(raw.as_ref()),
                }),
            }
        }

        if !errors.is_empty() {
            return Err(RotorError::ConfigValidation { errors });
        }

        Ok(Self {
            backends: backends.into(),
        })
    }

    /// Build the registry from the non-blank `backends` entries of a config.
    pub fn from_config(config: &Config) -> Result<Self, RotorError> {
        Self::new(&config.backend_addresses())
    }

    #[must_use]
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
