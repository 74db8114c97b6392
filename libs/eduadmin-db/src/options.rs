use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pool knobs applied on connect.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    pub idle_timeout: Option<Duration>,
    /// For `SQLite` file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
    /// Let the driver log every statement.
    pub sqlx_logging: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            create_sqlite_dirs: true,
            sqlx_logging: false,
        }
    }
}

/// `database` configuration section.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    pub dsn: String,
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,
    pub create_sqlite_dirs: bool,
    pub log_statements: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://data/eduadmin.db".to_owned(),
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            create_sqlite_dirs: true,
            log_statements: false,
        }
    }
}

impl DbConfig {
    #[must_use]
    pub fn connect_opts(&self) -> ConnectOpts {
        ConnectOpts {
            max_conns: self.max_conns,
            min_conns: self.min_conns,
            acquire_timeout: self.acquire_timeout,
            idle_timeout: self.idle_timeout,
            create_sqlite_dirs: self.create_sqlite_dirs,
            sqlx_logging: self.log_statements,
        }
    }
}
