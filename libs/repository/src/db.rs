use sqlx::postgres::{PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

const MAX_CONNECTIONS: u32 = 20;
const MIN_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT_SECS: u64 = 10;
const VERIFY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
    #[error("invalid DATABASE_PORT: {0}")]
    InvalidPort(String),
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database verification timed out after {0}s")]
    VerifyTimeout(u64),
    #[error("failed to read migration file {path}: {source}")]
    MigrationRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::Error),
}

/// Postgres connection settings, read from the platform's standard
/// environment variables.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub db_name: String,
    /// Plain SQL file applied at startup, when set.
    pub migration_file: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .field("migration_file", &self.migration_file)
            .finish()
    }
}

impl DatabaseConfig {
    /// Read `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB` (required),
    /// `DATABASE_HOST`/`DATABASE_PORT` (default `localhost:5432`) and
    /// `MIGRATION_FILE` (optional).
    pub fn from_env() -> Result<Self, DbError> {
        let user =
            std::env::var("POSTGRES_USER").map_err(|_| DbError::MissingEnv("POSTGRES_USER"))?;
        let password = std::env::var("POSTGRES_PASSWORD")
            .map_err(|_| DbError::MissingEnv("POSTGRES_PASSWORD"))?;
        let db_name =
            std::env::var("POSTGRES_DB").map_err(|_| DbError::MissingEnv("POSTGRES_DB"))?;
        let host = std::env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = match std::env::var("DATABASE_PORT") {
            Ok(raw) => raw.parse().map_err(|_| DbError::InvalidPort(raw))?,
            Err(_) => 5432,
        };
        let migration_file = std::env::var("MIGRATION_FILE").ok();

        Ok(Self { user, password, host, port, db_name, migration_file })
    }

    /// Connection URL. TLS stays off inside the cluster network.
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.db_name
        )
    }
}

/// Open a bounded pool and verify it answers before handing it out.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    debug!(
        host = %config.host,
        port = config.port,
        db = %config.db_name,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .test_before_acquire(true)
        .connect(&config.url())
        .await
        .map_err(DbError::Connect)?;

    match tokio::time::timeout(
        Duration::from_secs(VERIFY_TIMEOUT_SECS),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(db = %config.db_name, "database pool created and verified");
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "database verification failed");
            Err(DbError::Connect(e))
        }
        Err(_) => {
            error!(timeout_secs = VERIFY_TIMEOUT_SECS, "database verification timed out");
            Err(DbError::VerifyTimeout(VERIFY_TIMEOUT_SECS))
        }
    }
}

/// Apply a plain SQL migration file as a single batch. There is no version
/// tracking; the files are written to be re-runnable.
pub async fn run_migrations(pool: &PgPool, path: &str) -> Result<(), DbError> {
    debug!(path, "running migrations");

    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DbError::MigrationRead { path: path.to_string(), source })?;

    sqlx::raw_sql(&sql)
        .execute(pool)
        .await
        .map_err(DbError::Migration)?;

    info!(path, "migrations applied");
    Ok(())
}
