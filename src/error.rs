//! Unified error types for rotor.
//!
//! [`RotorError`] covers everything that can stop the process or a CLI
//! subcommand (configuration, binding, status queries). [`ForwardError`]
//! covers per-request proxy failures and knows which status code the
//! caller receives. [`ValidationError`] is a single config problem with an
//! optional hint.

use std::path::PathBuf;

use axum::http::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {} - {}", self.location, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RotorError {
    #[error("No backends configured.\n\n  {hint}")]
    NoBackends { hint: String },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Status check failed with status {0}")]
    StatusCheckFailed(hyper::StatusCode),
}

/// Why a backend address was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendParseError {
    #[error("backend address cannot be empty")]
    Empty,

    #[error("'{raw}' is not a valid URL: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { scheme: String },

    #[error("'{raw}' has no host")]
    MissingHost { raw: String },

    #[error("'{raw}' must not contain a query or fragment")]
    QueryOrFragment { raw: String },
}

/// Failure of a single proxied request after the body was buffered.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("no healthy backend available")]
    NoBackend,

    #[error("invalid upstream URI '{uri}': {source}")]
    UpstreamUri {
        uri: String,
        #[source]
        source: http::Error,
    },

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream response body: {0}")]
    ResponseBody(#[source] hyper::Error),
}

impl ForwardError {
    /// Status code the original caller receives for this failure.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NoBackend | Self::UpstreamUri { .. } | Self::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::ResponseBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
