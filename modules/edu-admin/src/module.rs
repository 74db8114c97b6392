use std::sync::Arc;

use eduadmin_db::{DbHandle, MigrationReport, run_migrations};
use eduadmin_security::{PermissionResolver, StaticRoleStore};
use tracing::info;

use crate::config::EduAdminConfig;
use crate::domain::{ClassInfoService, DomainError, SupplierService};
use crate::infra::storage::migrations::Migrator;

/// Textbook supplier and class administration, wired to one database.
pub struct EduAdmin {
    suppliers: SupplierService,
    classes: ClassInfoService,
    resolver: Arc<PermissionResolver>,
}

impl EduAdmin {
    /// Bring the schema up to date.
    ///
    /// # Errors
    /// `DomainError::Database` if a migration fails.
    pub async fn migrate(db: &DbHandle) -> Result<MigrationReport, DomainError> {
        info!("running edu-admin migrations");
        let report = run_migrations::<Migrator>(db).await.map_err(|e| match e {
            eduadmin_db::MigrationError::QueryHistory(db)
            | eduadmin_db::MigrationError::MigrationFailed(db) => DomainError::Database(db),
        })?;
        info!(applied = report.applied, skipped = report.skipped, "edu-admin migrations done");
        Ok(report)
    }

    /// Register both services. Search and scope declarations are checked here, once.
    ///
    /// # Errors
    /// `DomainError::Configuration` for an entity or request type that cannot be served.
    pub fn init(db: &DbHandle, cfg: &EduAdminConfig) -> Result<Self, DomainError> {
        let store = StaticRoleStore::from_config(&cfg.data_permission.store);
        let resolver = Arc::new(
            PermissionResolver::new(Arc::new(store)).with_enabled(cfg.data_permission.enabled),
        );
        Self::with_resolver(db, resolver, cfg)
    }

    /// Like [`EduAdmin::init`] with a caller-supplied resolver.
    ///
    /// # Errors
    /// See [`EduAdmin::init`].
    pub fn with_resolver(
        db: &DbHandle,
        resolver: Arc<PermissionResolver>,
        cfg: &EduAdminConfig,
    ) -> Result<Self, DomainError> {
        let suppliers = SupplierService::new(db.secure(), resolver.clone(), cfg.paging)?;
        let classes = ClassInfoService::new(db.secure(), resolver.clone(), cfg.paging)?;
        info!(
            data_permission = resolver.is_enabled(),
            "edu-admin module initialized"
        );
        Ok(Self {
            suppliers,
            classes,
            resolver,
        })
    }

    #[must_use]
    pub fn suppliers(&self) -> &SupplierService {
        &self.suppliers
    }

    #[must_use]
    pub fn classes(&self) -> &ClassInfoService {
        &self.classes
    }

    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }
}
