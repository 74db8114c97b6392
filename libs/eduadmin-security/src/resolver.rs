use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{DataPermission, DataScope, DeptId, SecurityContext, UserId};

/// One role held by a user, reduced to what data scoping needs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleGrant {
    pub role_key: String,
    pub data_scope: DataScope,
    /// Departments listed on the role; only meaningful for [`DataScope::Custom`].
    #[serde(default)]
    pub dept_ids: Vec<DeptId>,
}

/// A user's department membership plus every role grant they hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleAssignment {
    pub user_id: UserId,
    pub dept_id: Option<DeptId>,
    pub grants: Vec<RoleGrant>,
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("unknown department: {0}")]
    UnknownDepartment(DeptId),

    #[error("role store unavailable: {0}")]
    Store(String),
}

/// Source of role assignments and the department hierarchy.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Load the role assignment of `user_id`.
    ///
    /// # Errors
    /// `ResolveError::UnknownUser` when the user has no record, `Store` on backend failure.
    async fn assignment(&self, user_id: UserId) -> Result<RoleAssignment, ResolveError>;

    /// All departments strictly below `dept_id`.
    ///
    /// # Errors
    /// `ResolveError::UnknownDepartment` when `dept_id` is not known to the store.
    async fn descendants(&self, dept_id: DeptId) -> Result<Vec<DeptId>, ResolveError>;
}

/// Derives a [`DataPermission`] from the caller's identity.
///
/// Priority: any `all` grant wins; otherwise the union of every department-type grant;
/// otherwise the caller only sees rows they created. With scoping disabled every caller
/// resolves to `all`.
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn RoleStore>,
    enabled: bool,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl PermissionResolver {
    #[must_use]
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self {
            store,
            enabled: true,
        }
    }

    /// Toggle data scoping. When disabled the store is never consulted.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve the permission for the caller in `ctx`.
    ///
    /// # Errors
    /// Propagates [`ResolveError`] from the role store.
    #[instrument(skip(self, ctx), fields(user_id = ctx.subject_id()))]
    pub async fn resolve(&self, ctx: &SecurityContext) -> Result<DataPermission, ResolveError> {
        let user_id = ctx.subject_id();
        if !self.enabled {
            debug!("data permission disabled, granting all");
            return Ok(DataPermission::all(user_id));
        }

        let assignment = self.store.assignment(user_id).await?;

        if assignment
            .grants
            .iter()
            .any(|g| g.data_scope == DataScope::All)
        {
            debug!("resolved data permission: all");
            return Ok(DataPermission::all(user_id));
        }

        let mut depts: Option<Vec<DeptId>> = None;
        for grant in assignment
            .grants
            .iter()
            .filter(|g| g.data_scope.is_department_grant())
        {
            let acc = depts.get_or_insert_with(Vec::new);
            match grant.data_scope {
                DataScope::Custom => acc.extend_from_slice(&grant.dept_ids),
                DataScope::Department => acc.extend(assignment.dept_id),
                DataScope::DepartmentAndBelow => {
                    if let Some(dept_id) = assignment.dept_id {
                        acc.push(dept_id);
                        acc.extend(self.store.descendants(dept_id).await?);
                    }
                }
                DataScope::All | DataScope::Own => {}
            }
        }

        let permission = match depts {
            Some(ids) => DataPermission::departments(user_id, ids),
            None => DataPermission::own_records(user_id),
        };
        debug!(mode = ?permission.mode(), depts = ?permission.dept_ids(), "resolved data permission");
        Ok(permission)
    }
}
