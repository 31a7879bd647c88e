//! A single upstream server.
//!
//! A [`Backend`] is just its base URL. Two backends are the same backend
//! iff their normalized address strings are equal.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::BackendParseError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Backend {
    addr: Arc<str>,
}

impl Backend {
    /// Parse and normalize a backend base URL.
    ///
    /// Accepts absolute `http`/`https` URLs with a host. Surrounding
    /// whitespace and trailing slashes are dropped so that joining the
    /// address with a request path never produces `//`.
    pub fn parse(raw: &str) -> Result<Self, BackendParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BackendParseError::Empty);
        }

        let parsed = Url::parse(trimmed).map_err(|source| BackendParseError::InvalidUrl {
            raw: trimmed.to_string(),
            source,
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(BackendParseError::UnsupportedScheme {
                scheme: scheme.to_string(),
            });
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(BackendParseError::MissingHost {
                raw: trimmed.to_string(),
            });
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(BackendParseError::QueryOrFragment {
                raw: trimmed.to_string(),
            });
        }

        Ok(Self {
            addr: Arc::from(trimmed.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.addr
    }

    /// Full upstream URL for a request path (which includes any query).
    #[must_use]
    pub fn join(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{path_and_query}", self.addr)
        } else {
            format!("{}/{path_and_query}", self.addr)
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}
