use eduadmin_db::paging::PageLimits;
use eduadmin_security::StaticRoleStoreConfig;
use serde::{Deserialize, Serialize};

/// Settings consumed by [`EduAdmin`](crate::EduAdmin).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EduAdminConfig {
    pub paging: PageLimits,
    pub data_permission: DataPermissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataPermissionConfig {
    /// When `false` every caller sees every row.
    pub enabled: bool,
    /// Departments, roles and user assignments.
    pub store: StaticRoleStoreConfig,
}

impl Default for DataPermissionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            store: StaticRoleStoreConfig::default(),
        }
    }
}
