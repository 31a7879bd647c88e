//! File-based config loading.
//!
//! Format is picked from the file extension: YAML (default feature), JSON
//! and TOML behind the `json` and `toml` features.

use std::path::{Path, PathBuf};

use super::model::Config;
use crate::error::RotorError;

/// File names probed in the working directory when no config is given.
pub const CANDIDATES: &[&str] = &["rotor.yaml", "rotor.yml", "rotor.json", "rotor.toml"];

/// Parse a config string based on file extension.
pub fn parse_config_str(ext: &str, content: &str, path_display: &str) -> Result<Config, RotorError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| RotorError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| RotorError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| RotorError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(RotorError::UnsupportedFormat(other.to_string())),
    }
}

/// Read and parse a config file. Does not validate.
pub async fn load_file(path: &Path) -> Result<Config, RotorError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RotorError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RotorError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

/// First candidate file present in the working directory, if any.
pub async fn detect() -> Option<PathBuf> {
    for name in CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Some(path);
        }
    }
    None
}
