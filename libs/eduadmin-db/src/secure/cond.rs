use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, sea_query::Expr};

use crate::secure::error::ScopeError;
use crate::secure::{DataPermission, PermissionMode, ScopableEntity};

/// Builds the row filter for `perm` against entity `E`.
///
/// # Policy
/// - **all**: empty condition (no restriction)
/// - **departments**: `dept_col IN (ids)`; an empty id set denies everything
/// - **own records**: `creator_col = user_id`
///
/// The same condition is used for list, get, update and delete, so every call site
/// authorizes identically.
///
/// # Errors
/// `ScopeError::Misconfigured` when the mode needs a column `E` does not declare.
pub fn build_permission_condition<E>(perm: &DataPermission) -> Result<Condition, ScopeError>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let deny_all = || Condition::all().add(Expr::value(false));

    match perm.mode() {
        PermissionMode::All => Ok(Condition::all()),
        PermissionMode::Departments => {
            let col = E::dept_col().ok_or_else(|| {
                ScopeError::misconfigured::<E>("department-scoped permission needs a dept column")
            })?;
            if perm.dept_ids().is_empty() {
                return Ok(deny_all());
            }
            Ok(Condition::all().add(col.is_in(perm.dept_ids().iter().copied())))
        }
        PermissionMode::OwnRecords => {
            let col = E::creator_col().ok_or_else(|| {
                ScopeError::misconfigured::<E>("own-records permission needs a creator column")
            })?;
            Ok(Condition::all().add(col.eq(perm.user_id())))
        }
    }
}

/// AND `cond` into `query`. An empty condition leaves the statement without a `WHERE`.
pub fn and_where<Q: QueryFilter>(query: Q, cond: Condition) -> Q {
    if cond.is_empty() {
        query
    } else {
        query.filter(cond)
    }
}
