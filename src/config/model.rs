//! Serde data structures for the rotor configuration file.
//!
//! [`Config`] is the root: the backend list plus [`HealthCheck`] settings.
//! Both derive `Serialize` and `Deserialize` with `deny_unknown_fields`.

use serde::{Deserialize, Serialize};

const fn default_probe_timeout() -> u64 {
    5000
}

fn is_default_probe_timeout(v: &u64) -> bool {
    *v == default_probe_timeout()
}

fn is_default_health_check(v: &HealthCheck) -> bool {
    v.interval.is_none() && is_default_probe_timeout(&v.timeout)
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend base URLs, in rotation order.
    #[serde(default)]
    pub backends: Vec<String>,

    #[serde(default, skip_serializing_if = "is_default_health_check")]
    pub health_check: HealthCheck,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheck {
    /// Seconds between probe cycles. Required; must be positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Per-probe timeout in milliseconds.
    #[serde(
        default = "default_probe_timeout",
        skip_serializing_if = "is_default_probe_timeout"
    )]
    pub timeout: u64,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self {
            interval: None,
            timeout: default_probe_timeout(),
        }
    }
}

impl Config {
    /// Non-blank backend entries, trimmed.
    #[must_use]
    pub fn backend_addresses(&self) -> Vec<&str> {
        self.backends
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .collect()
    }
}
