use sea_orm::EntityTrait;

use super::RecordId;

/// Ownership columns of an entity that can be filtered by a data permission.
///
/// Every dimension is declared explicitly, either as `Some(Column::..)` or `None`.
/// An entity without a department column cannot be queried under a department-scoped
/// permission, and one without a creator column cannot be queried under own-records.
///
/// Usually derived:
///
/// ```rust,ignore
/// #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Scopable)]
/// #[sea_orm(table_name = "em_class_info")]
/// #[secure(id_col = "id", dept_col = "dept_id", creator_col = "create_by", updater_col = "update_by")]
/// pub struct Model { /* ... */ }
/// ```
pub trait ScopableEntity: EntityTrait {
    /// Primary key column.
    fn id_col() -> Self::Column;

    /// Column holding the owning department.
    fn dept_col() -> Option<Self::Column>;

    /// Column stamped with the creating user on insert.
    fn creator_col() -> Option<Self::Column>;

    /// Column stamped with the acting user on update.
    fn updater_col() -> Option<Self::Column>;

    /// Primary key of a loaded row.
    fn id_of(model: &Self::Model) -> RecordId;
}
