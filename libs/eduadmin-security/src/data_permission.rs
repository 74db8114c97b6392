use crate::{DeptId, UserId};

/// Coarse classification of a [`DataPermission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// No row restriction.
    All,
    /// Rows owned by one of the resolved departments.
    Departments,
    /// Rows created by the caller.
    OwnRecords,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum RowScope {
    All,
    Departments { dept_ids: Vec<DeptId> },
    OwnRecords,
}

/// Resolved, per-request description of which rows a caller may access.
///
/// Built once by the [`PermissionResolver`](crate::PermissionResolver) and read-only
/// afterwards. Storage code turns it into a query predicate; it never inspects
/// returned rows after the fact.
///
/// An empty department set is legal and grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataPermission {
    user_id: UserId,
    #[serde(flatten)]
    scope: RowScope,
}

impl DataPermission {
    #[must_use]
    pub fn all(user_id: UserId) -> Self {
        Self {
            user_id,
            scope: RowScope::All,
        }
    }

    /// Department-scoped permission. The id set is sorted and de-duplicated.
    #[must_use]
    pub fn departments(user_id: UserId, mut dept_ids: Vec<DeptId>) -> Self {
        dept_ids.sort_unstable();
        dept_ids.dedup();
        Self {
            user_id,
            scope: RowScope::Departments { dept_ids },
        }
    }

    #[must_use]
    pub fn own_records(user_id: UserId) -> Self {
        Self {
            user_id,
            scope: RowScope::OwnRecords,
        }
    }

    #[must_use]
    pub fn mode(&self) -> PermissionMode {
        match self.scope {
            RowScope::All => PermissionMode::All,
            RowScope::Departments { .. } => PermissionMode::Departments,
            RowScope::OwnRecords => PermissionMode::OwnRecords,
        }
    }

    /// The acting user. Also used as the creator filter in own-records mode.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Departments granted in department mode; empty in every other mode.
    #[must_use]
    pub fn dept_ids(&self) -> &[DeptId] {
        match &self.scope {
            RowScope::Departments { dept_ids } => dept_ids,
            RowScope::All | RowScope::OwnRecords => &[],
        }
    }

    /// Evaluates the permission against a row's owning department and creator.
    ///
    /// Mirrors the SQL predicate produced by the storage layer and is meant for
    /// assertions, not for filtering fetched rows.
    #[must_use]
    pub fn allows(&self, dept_id: DeptId, created_by: UserId) -> bool {
        match &self.scope {
            RowScope::All => true,
            RowScope::Departments { dept_ids } => dept_ids.binary_search(&dept_id).is_ok(),
            RowScope::OwnRecords => created_by == self.user_id,
        }
    }
}
