/// Errors raised by scoped query execution.
#[derive(thiserror::Error, Debug)]
pub enum ScopeError {
    /// Storage failure, passed through unchanged.
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    /// The permission mode needs a column the entity does not declare.
    #[error("entity `{entity}` cannot be scoped: {reason}")]
    Misconfigured { entity: String, reason: &'static str },

    /// Single-row read found nothing under the permission predicate.
    #[error("object does not exist or access is not permitted")]
    NotFoundOrForbidden,

    /// Update touched zero rows.
    #[error("no permission to update this data")]
    UpdateDenied,

    /// Delete touched zero rows.
    #[error("no permission to delete this data")]
    DeleteDenied,
}

impl ScopeError {
    pub(crate) fn misconfigured<E: sea_orm::EntityTrait>(reason: &'static str) -> Self {
        Self::Misconfigured {
            entity: sea_orm::EntityName::table_name(&E::default()).to_owned(),
            reason,
        }
    }
}
