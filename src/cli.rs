//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, validate, status, echo), and their associated
//! argument structs. Every `run` flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "rotor",
    version,
    about = "Round-robin HTTP load balancer with active health checks",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        HOSTS=http://10.0.0.1:8080,http://10.0.0.2:8080 rotor run 5\n  \
        rotor run 5 -b http://a:8080,http://b:8080 -p 8000\n  \
        rotor run -c rotor.yaml"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the load balancer
    Run(Box<RunArgs>),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Query the status endpoint of a running instance
    Status(StatusArgs),

    /// Run a demonstration backend that answers every request
    Echo(EchoArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        rotor run 5 -b http://a:8080,http://b:8080        Probe every 5s\n  \
        rotor run -c rotor.yaml --pretty                   From a config file\n  \
        rotor run 5 --status-path /__rotor/status          Expose pool status")]
pub struct RunArgs {
    /// Health check period in seconds
    #[arg(env = "HEALTH_CHECK_PERIOD")]
    pub interval: Option<u64>,

    /// Comma-separated backend base URLs
    #[arg(
        short,
        long,
        env = "HOSTS",
        value_delimiter = ',',
        value_name = "URL,..."
    )]
    pub backends: Vec<String>,

    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 80)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Health probe timeout in milliseconds
    #[arg(long, env = "PROBE_TIMEOUT_MS", help_heading = "Tuning")]
    pub probe_timeout: Option<u64>,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 10 * 1024 * 1024,
        help_heading = "Tuning"
    )]
    pub max_body: usize,

    /// Serve pool status as JSON on this path instead of forwarding it
    #[arg(long, env = "STATUS_PATH", help_heading = "Observability")]
    pub status_path: Option<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "rotor.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Status URL of the running instance
    #[arg(default_value = "http://localhost:80/__rotor/status")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct EchoArgs {
    /// Listen port
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Body returned for every request
    #[arg(short, long, default_value = "Hello From Backend Server")]
    pub message: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
