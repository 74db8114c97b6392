//! Layered configuration: defaults, then the YAML file, then `EDUADMIN__*` environment
//! variables, then command-line overrides.

use std::path::Path;

use edu_admin::{DataPermissionConfig, EduAdminConfig};
use eduadmin_db::DbConfig;
use eduadmin_db::paging::PageLimits;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

pub const ENV_PREFIX: &str = "EDUADMIN__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DbConfig,
    pub logging: LoggingConfig,
    pub paging: PageLimits,
    pub data_permission: DataPermissionConfig,
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dsn: Option<String>,
    pub verbose: u8,
}

impl AppConfig {
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// # Errors
    /// Missing file, malformed YAML, unknown keys or values of the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, figment::Error> {
        if let Some(path) = path.filter(|p| !p.is_file()) {
            return Err(figment::Error::from(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }
        let mut config: Self = Self::figment(path).extract()?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(dsn) = &overrides.dsn {
            self.database.dsn.clone_from(dsn);
        }
        if overrides.verbose > 0 {
            self.logging.level = match overrides.verbose {
                1 => "debug",
                _ => "trace",
            }
            .to_owned();
        }
    }

    #[must_use]
    pub fn edu_admin(&self) -> EduAdminConfig {
        EduAdminConfig {
            paging: self.paging,
            data_permission: self.data_permission.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = AppConfig::load(None, &CliOverrides::default())?;
            assert_eq!(cfg.database.dsn, DbConfig::default().dsn);
            assert_eq!(cfg.paging, PageLimits::default());
            assert!(cfg.data_permission.enabled);
            assert_eq!(cfg.logging.format, LogFormat::Text);
            Ok(())
        });
    }

    #[test]
    fn yaml_then_env_then_cli() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "eduadmin.yaml",
                r"
database:
  dsn: sqlite://from-file.db
  max_conns: 4
paging:
  max_size: 50
data_permission:
  enabled: false
  store:
    users:
      - { id: 7, role_ids: [] }
",
            )?;
            jail.set_env("EDUADMIN__PAGING__DEFAULT_SIZE", "25");
            jail.set_env("EDUADMIN__DATABASE__DSN", "sqlite://from-env.db");

            let path = PathBuf::from("eduadmin.yaml");
            let cfg = AppConfig::load(Some(&path), &CliOverrides::default())?;
            assert_eq!(cfg.database.dsn, "sqlite://from-env.db");
            assert_eq!(cfg.database.max_conns, Some(4));
            assert_eq!(cfg.paging.default_size, 25);
            assert_eq!(cfg.paging.max_size, 50);
            assert!(!cfg.data_permission.enabled);
            assert_eq!(cfg.data_permission.store.users.len(), 1);

            let cfg = AppConfig::load(
                Some(&path),
                &CliOverrides {
                    dsn: Some("sqlite::memory:".into()),
                    verbose: 2,
                },
            )?;
            assert_eq!(cfg.database.dsn, "sqlite::memory:");
            assert_eq!(cfg.logging.level, "trace");
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "databse:\n  dsn: sqlite::memory:\n")?;
            let err = AppConfig::load(Some(Path::new("bad.yaml")), &CliOverrides::default())
                .unwrap_err();
            assert!(err.to_string().contains("databse"), "{err}");
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            assert!(
                AppConfig::load(Some(Path::new("nope.yaml")), &CliOverrides::default()).is_err()
            );
            Ok(())
        });
    }

    #[test]
    fn shipped_sample_config_loads() {
        Jail::expect_with(|_jail| {
            let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/eduadmin.yaml");
            let cfg = AppConfig::load(Some(&path), &CliOverrides::default())?;
            assert_eq!(cfg.database.acquire_timeout, Some(std::time::Duration::from_secs(30)));
            assert_eq!(cfg.data_permission.store.roles.len(), 5);
            assert_eq!(cfg.edu_admin().paging.max_size, 500);
            Ok(())
        });
    }
}
