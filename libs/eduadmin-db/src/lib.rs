//! Permission-scoped data access for the eduadmin entities.
//!
//! - [`secure`]: turns a [`DataPermission`](eduadmin_security::DataPermission) into a query
//!   predicate and only lets scoped queries execute.
//! - [`search`]: declarative search conditions bound from request objects.
//! - [`paging`]: page index/size to offset/limit, with an unbounded sentinel.
//! - [`crud`]: List / Get / Create / Update / Remove composed from the three above.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use thiserror::Error;
use tracing::{debug, info};

pub mod crud;
pub mod migration_runner;
pub mod options;
pub mod paging;
pub mod search;
pub mod secure;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use crud::{CrudOps, InsertCommand, RegistrationError, RemoveCommand, UpdateCommand};
pub use migration_runner::{MigrationError, MigrationReport, run_migrations};
pub use options::{ConnectOpts, DbConfig};
pub use paging::{Page, PageLimits, PageRequest};

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    MySql,
    Sqlite,
}

impl DbEngine {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Owns the connection pool for one database.
#[derive(Clone, Debug)]
pub struct DbHandle {
    engine: DbEngine,
    dsn: String,
    conn: DatabaseConnection,
}

impl DbHandle {
    /// Detect engine by DSN scheme.
    ///
    /// # Errors
    /// Returns `DbError::UnknownDsn` if the scheme is not recognized.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("mysql://") {
            Ok(DbEngine::MySql)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_owned()))
        }
    }

    /// Connect and build the handle.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid, the engine feature is disabled or the
    /// connection fails.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        let dsn = match engine {
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => sqlite::prepare_dsn(dsn.trim(), opts.create_sqlite_dirs)?,
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => return Err(DbError::FeatureDisabled("SQLite feature not enabled")),
            #[cfg(feature = "pg")]
            DbEngine::Postgres => dsn.trim().to_owned(),
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => {
                return Err(DbError::FeatureDisabled("PostgreSQL feature not enabled"));
            }
            #[cfg(feature = "mysql")]
            DbEngine::MySql => dsn.trim().to_owned(),
            #[cfg(not(feature = "mysql"))]
            DbEngine::MySql => return Err(DbError::FeatureDisabled("MySQL feature not enabled")),
        };

        let mut options = ConnectOptions::new(dsn.clone());
        if let Some(n) = opts.max_conns {
            options.max_connections(n);
        }
        if let Some(n) = opts.min_conns {
            options.min_connections(n);
        }
        if let Some(t) = opts.acquire_timeout {
            options.acquire_timeout(t);
        }
        if let Some(t) = opts.idle_timeout {
            options.idle_timeout(t);
        }
        options.sqlx_logging(opts.sqlx_logging);

        debug!(engine = engine.as_str(), "connecting to database");
        let conn = Database::connect(options).await?;
        info!(engine = engine.as_str(), "database connected");

        Ok(Self { engine, dsn, conn })
    }

    /// Connect using a [`DbConfig`] section.
    ///
    /// # Errors
    /// See [`DbHandle::connect`].
    pub async fn from_config(cfg: &DbConfig) -> Result<Self> {
        if cfg.dsn.trim().is_empty() {
            return Err(DbError::InvalidConfig("database.dsn must not be empty".to_owned()));
        }
        Self::connect(&cfg.dsn, cfg.connect_opts()).await
    }

    #[must_use]
    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Raw connection. Reserved for migrations; entity access goes through [`DbHandle::secure`].
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    #[must_use]
    pub fn secure(&self) -> secure::SecureConn {
        secure::SecureConn::new(self.conn.clone())
    }

    /// Close the pool explicitly.
    ///
    /// # Errors
    /// Returns an error if the driver fails to close.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn detects_engines() {
        assert_eq!(
            DbHandle::detect("postgres://u:p@localhost/db").unwrap(),
            DbEngine::Postgres
        );
        assert_eq!(
            DbHandle::detect("mysql://u:p@localhost/db").unwrap(),
            DbEngine::MySql
        );
        assert_eq!(
            DbHandle::detect("sqlite::memory:").unwrap(),
            DbEngine::Sqlite
        );
        assert!(matches!(
            DbHandle::detect("redis://localhost"),
            Err(DbError::UnknownDsn(_))
        ));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn connects_to_in_memory_sqlite() {
        let opts = ConnectOpts {
            max_conns: Some(1),
            ..Default::default()
        };
        let db = DbHandle::connect("sqlite::memory:", opts).await.unwrap();
        assert_eq!(db.engine(), DbEngine::Sqlite);
        assert_eq!(db.secure().db_engine(), "sqlite");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_dsn_is_rejected() {
        let cfg = DbConfig {
            dsn: "  ".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            DbHandle::from_config(&cfg).await,
            Err(DbError::InvalidConfig(_))
        ));
    }
}
