//! Rotor is a round-robin HTTP load balancer with active health checks.
//!
//! It forwards every incoming request, unchanged, to one backend chosen in
//! rotation from the set of backends that passed the most recent health
//! probe, and relays the backend's response to the caller. A background
//! monitor probes every registered backend on a fixed period and publishes
//! the healthy subset in one atomic swap.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, status, echo).
//! - [`config`] -- Startup configuration: file loading, CLI overrides, and
//!   validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`monitor`] -- Periodic concurrent health probing via the
//!   [`Prober`](monitor::Prober) trait.
//! - [`pool`] -- Backend registry, the published healthy snapshot, and the
//!   round-robin selector.
//! - [`proxy`] -- Per-request pipeline: buffer, select, forward, relay.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//! - [`status`] -- Optional JSON status endpoint.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file formats |
//! | `full` | All features |

// Public items serve the binary and the integration tests.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod pool;
pub mod proxy;
pub mod server;
pub mod status;
