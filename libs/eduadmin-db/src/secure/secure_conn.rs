//! `SecureConn`: the only door to entity rows.
//!
//! Wraps a `DatabaseConnection` and hands out queries that already carry the caller's
//! permission predicate. Update and delete embed the predicate in the write statement
//! itself and read the affected-row count as the authorization verdict.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseBackend, DatabaseConnection, EntityTrait, IntoActiveModel,
};
use tracing::debug;

use crate::secure::db_ops::{SecureDeleteExt, SecureDeleteMany, SecureUpdateExt, SecureUpdateMany};
use crate::secure::{
    DataPermission, RecordId, ScopableEntity, ScopeError, Scoped, SecureEntityExt, SecureSelect,
    UserId, secure_insert, stamp_column,
};

#[derive(Clone, Debug)]
pub struct SecureConn {
    conn: DatabaseConnection,
}

impl SecureConn {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    #[must_use]
    pub fn db_engine(&self) -> &'static str {
        match self.conn.get_database_backend() {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::MySql => "mysql",
            DatabaseBackend::Sqlite => "sqlite",
        }
    }

    /// Scoped select over every row `perm` allows.
    ///
    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    #[allow(clippy::unused_self)] // Keep fluent &SecureConn API even when method only delegates
    pub fn find<E>(&self, perm: &DataPermission) -> Result<SecureSelect<E, Scoped>, ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
    {
        E::find().secure().scope_with(perm)
    }

    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    pub fn find_by_id<E>(
        &self,
        perm: &DataPermission,
        id: RecordId,
    ) -> Result<SecureSelect<E, Scoped>, ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
    {
        Ok(self.find::<E>(perm)?.and_id(id))
    }

    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    #[allow(clippy::unused_self)] // Delegates but matches the rest of the connection API
    pub fn update_many<E>(
        &self,
        perm: &DataPermission,
    ) -> Result<SecureUpdateMany<E, Scoped>, ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
    {
        E::update_many().secure().scope_with(perm)
    }

    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    #[allow(clippy::unused_self)] // Retain method-style ergonomics for callers of SecureConn
    pub fn delete_many<E>(
        &self,
        perm: &DataPermission,
    ) -> Result<SecureDeleteMany<E, Scoped>, ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
    {
        E::delete_many().secure().scope_with(perm)
    }

    /// # Errors
    /// Returns `ScopeError::Db` if the insert fails.
    pub async fn insert<E>(
        &self,
        am: E::ActiveModel,
        created_by: UserId,
    ) -> Result<E::Model, ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<E::ActiveModel>,
    {
        secure_insert::<E>(am, created_by, &self.conn).await
    }

    /// Fetch `id` under `perm`, let `apply` produce the changes, then write them with the
    /// same predicate in the UPDATE statement.
    ///
    /// A row hidden by `perm` and a write that reports zero affected rows both end in
    /// `ScopeError::UpdateDenied`. The updater column is stamped with `perm.user_id()`.
    ///
    /// # Errors
    /// `UpdateDenied` as above, `Db` on storage failure, `Misconfigured` for an
    /// entity that cannot carry the permission.
    pub async fn update_with_permission<E, F>(
        &self,
        perm: &DataPermission,
        id: RecordId,
        apply: F,
    ) -> Result<(), ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        F: FnOnce(E::Model) -> E::ActiveModel + Send,
    {
        let Some(current) = self.find_by_id::<E>(perm, id)?.one(&self.conn).await? else {
            debug!(id, "update target not visible under permission");
            return Err(ScopeError::UpdateDenied);
        };

        let mut am = apply(current);
        stamp_column::<E>(&mut am, E::updater_col(), perm.user_id());
        if !am.is_changed() {
            return Ok(());
        }

        let result = self
            .update_many::<E>(perm)?
            .filter(Condition::all().add(E::id_col().eq(id)))
            .set(am)
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ScopeError::UpdateDenied);
        }
        Ok(())
    }

    /// Delete every id in `ids` that `perm` allows, in a single statement.
    ///
    /// Returns the number of rows removed; zero is `ScopeError::DeleteDenied`.
    ///
    /// # Errors
    /// `DeleteDenied`, `Db` on storage failure, `Misconfigured` as for `find`.
    pub async fn delete_by_ids<E>(
        &self,
        perm: &DataPermission,
        ids: &[RecordId],
    ) -> Result<u64, ScopeError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
    {
        let result = self
            .delete_many::<E>(perm)?
            .filter(Condition::all().add(E::id_col().is_in(ids.iter().copied())))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ScopeError::DeleteDenied);
        }
        Ok(result.rows_affected)
    }
}
