//! Logging and stat shipping for ClassConnect services
//!
//! Local logging goes through `tracing`; [`init_tracing`] installs the fmt
//! subscriber the way every service does at startup. The broker side channel
//! is an explicit [`EventEmitter`] handle: log lines fan out on the `logs`
//! exchange and domain events on the `stats` exchange, both consumed by the
//! platform's metrics service. [`ServiceConfig`] gathers the service-level
//! environment variables (bind address, environment, log level, JWT secret)
//! read at the same point in startup.

use broker_client::{BrokerError, Client};
use event_schema::{CodecError, DomainEvent};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOGS_EXCHANGE: &str = "logs";
pub const STATS_EXCHANGE: &str = "stats";

#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error(transparent)]
    InvalidLevel(#[from] InvalidLogLevel),
}

/// Service-level settings every ClassConnect service reads at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: LogLevel,
    pub secret: String,
}

impl ServiceConfig {
    /// Read `HOST` (default `0.0.0.0`), `PORT` (default `8080`),
    /// `ENVIRONMENT` (default `development`), `LOG_LEVEL` (default `info`)
    /// and `SECRET` (required, the platform's JWT signing key).
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = match std::env::var("LOG_LEVEL") {
            Ok(raw) => raw.parse()?,
            Err(_) => LogLevel::Info,
        };
        let secret = std::env::var("SECRET").map_err(|_| ConfigError::MissingEnv("SECRET"))?;

        Ok(Self { host, port, environment, log_level, secret })
    }
}

/// Platform log levels, as carried in the `level` header on the `logs`
/// exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        }
    }

    /// Directive for the tracing env-filter. `fatal` and `panic` have no
    /// tracing equivalent and collapse to `error`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal | Self::Panic => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("invalid level: {0}")]
pub struct InvalidLogLevel(String);

impl FromStr for LogLevel {
    type Err = InvalidLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            other => Err(InvalidLogLevel(other.to_string())),
        }
    }
}

/// Install the fmt tracing subscriber. `RUST_LOG` overrides `level` when
/// set. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(service_name: &str, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
    tracing::debug!(service = service_name, "tracing initialized");
}

/// Broker-backed emitter for the `logs` and `stats` exchanges.
///
/// Constructed once at startup from the service's broker client and passed
/// down to whatever needs it.
#[derive(Clone)]
pub struct EventEmitter {
    client: Client,
}

impl EventEmitter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Publish a domain event to the `stats` exchange, tagged by its
    /// discriminator. Encode failures are returned, never escalated.
    pub async fn emit(&self, event: &DomainEvent) -> Result<(), EmitError> {
        let body = event.encode()?;
        self.client
            .publish(
                STATS_EXCHANGE,
                [("type".to_string(), event.discriminator().to_string())],
                &body,
            )
            .await?;
        Ok(())
    }

    /// Ship a log line to the `logs` exchange with its level in the headers.
    pub async fn ship_log(&self, level: LogLevel, message: &str) -> Result<(), EmitError> {
        self.client
            .publish(
                LOGS_EXCHANGE,
                [("level".to_string(), level.to_string())],
                message.as_bytes(),
            )
            .await?;
        Ok(())
    }
}
