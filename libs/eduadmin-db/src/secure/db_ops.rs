use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel,
};
use std::marker::PhantomData;

use crate::secure::cond::{and_where, build_permission_condition};
use crate::secure::error::ScopeError;
use crate::secure::{DataPermission, ScopableEntity, Scoped, Unscoped, UserId};

/// Write `user_id` into `col` when the entity declares it.
pub fn stamp_column<E>(am: &mut E::ActiveModel, col: Option<E::Column>, user_id: UserId)
where
    E: EntityTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
{
    if let Some(col) = col {
        am.set(col, user_id.into());
    }
}

/// Insert a new row, stamping the creator column with `created_by`.
///
/// No permission predicate applies to inserts; who may create is decided upstream.
///
/// # Errors
/// Returns `ScopeError::Db` if the insert fails.
pub async fn secure_insert<E>(
    mut am: E::ActiveModel,
    created_by: UserId,
    conn: &impl ConnectionTrait,
) -> Result<E::Model, ScopeError>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    stamp_column::<E>(&mut am, E::creator_col(), created_by);
    Ok(am.insert(conn).await?)
}

/// A `SeaORM` `UpdateMany` that can only run after `.scope_with()`.
#[derive(Clone, Debug)]
pub struct SecureUpdateMany<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::UpdateMany<E>,
    pub(crate) _state: PhantomData<S>,
}

pub trait SecureUpdateExt<E: EntityTrait>: Sized {
    fn secure(self) -> SecureUpdateMany<E, Unscoped>;
}

impl<E> SecureUpdateExt<E> for sea_orm::UpdateMany<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureUpdateMany<E, Unscoped> {
        SecureUpdateMany {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureUpdateMany<E, Unscoped>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    pub fn scope_with(
        self,
        perm: &DataPermission,
    ) -> Result<SecureUpdateMany<E, Scoped>, ScopeError> {
        let cond = build_permission_condition::<E>(perm)?;
        Ok(SecureUpdateMany {
            inner: and_where(self.inner, cond),
            _state: PhantomData,
        })
    }
}

impl<E> SecureUpdateMany<E, Scoped>
where
    E: EntityTrait,
{
    #[must_use]
    pub fn filter(mut self, filter: Condition) -> Self {
        self.inner = and_where(self.inner, filter);
        self
    }

    /// Write every `Set` field of `am`; `Unchanged` fields are left alone.
    #[must_use]
    pub fn set<A>(mut self, am: A) -> Self
    where
        A: ActiveModelTrait<Entity = E>,
    {
        self.inner = self.inner.set(am);
        self
    }

    /// # Errors
    /// Returns `ScopeError::Db` if the statement fails.
    pub async fn exec<C: ConnectionTrait>(
        self,
        conn: &C,
    ) -> Result<sea_orm::UpdateResult, ScopeError> {
        Ok(self.inner.exec(conn).await?)
    }
}

/// A `SeaORM` `DeleteMany` that can only run after `.scope_with()`.
#[derive(Clone, Debug)]
pub struct SecureDeleteMany<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::DeleteMany<E>,
    pub(crate) _state: PhantomData<S>,
}

pub trait SecureDeleteExt<E: EntityTrait>: Sized {
    fn secure(self) -> SecureDeleteMany<E, Unscoped>;
}

impl<E> SecureDeleteExt<E> for sea_orm::DeleteMany<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureDeleteMany<E, Unscoped> {
        SecureDeleteMany {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureDeleteMany<E, Unscoped>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    pub fn scope_with(
        self,
        perm: &DataPermission,
    ) -> Result<SecureDeleteMany<E, Scoped>, ScopeError> {
        let cond = build_permission_condition::<E>(perm)?;
        Ok(SecureDeleteMany {
            inner: and_where(self.inner, cond),
            _state: PhantomData,
        })
    }
}

impl<E> SecureDeleteMany<E, Scoped>
where
    E: EntityTrait,
{
    #[must_use]
    pub fn filter(mut self, filter: Condition) -> Self {
        self.inner = and_where(self.inner, filter);
        self
    }

    /// # Errors
    /// Returns `ScopeError::Db` if the statement fails.
    pub async fn exec<C: ConnectionTrait>(
        self,
        conn: &C,
    ) -> Result<sea_orm::DeleteResult, ScopeError> {
        Ok(self.inner.exec(conn).await?)
    }
}
