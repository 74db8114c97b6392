use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect,
};
use std::marker::PhantomData;

use crate::paging::Bounds;
use crate::secure::cond::{and_where, build_permission_condition};
use crate::secure::error::ScopeError;
use crate::secure::{DataPermission, RecordId, ScopableEntity};

/// Typestate marker: no permission applied yet; the query cannot execute.
#[derive(Debug, Clone, Copy)]
pub struct Unscoped;

/// Typestate marker: the permission predicate is part of the WHERE clause.
#[derive(Debug, Clone, Copy)]
pub struct Scoped;

/// A `SeaORM` `Select` that can only run after `.scope_with()`.
///
/// ```rust,ignore
/// let page = em_textbook_sup::Entity::find()
///     .secure()
///     .scope_with(&perm)?
///     .filter(search_condition)
///     .paginate(bounds)
///     .all(conn)
///     .await?;
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct SecureSelect<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::Select<E>,
    pub(crate) _state: PhantomData<S>,
}

/// Converts a plain `Select` into an unscoped [`SecureSelect`].
pub trait SecureEntityExt<E: EntityTrait>: Sized {
    fn secure(self) -> SecureSelect<E, Unscoped>;
}

impl<E> SecureEntityExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureSelect<E, Unscoped> {
        SecureSelect {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureSelect<E, Unscoped>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// AND the permission predicate into the query.
    ///
    /// # Errors
    /// `ScopeError::Misconfigured` if the entity lacks the column the mode needs.
    pub fn scope_with(self, perm: &DataPermission) -> Result<SecureSelect<E, Scoped>, ScopeError> {
        let cond = build_permission_condition::<E>(perm)?;
        Ok(SecureSelect {
            inner: and_where(self.inner, cond),
            _state: PhantomData,
        })
    }
}

impl<E> SecureSelect<E, Scoped>
where
    E: EntityTrait,
{
    /// # Errors
    /// Returns `ScopeError::Db` if the query fails.
    pub async fn all<C>(self, conn: &C) -> Result<Vec<E::Model>, ScopeError>
    where
        C: ConnectionTrait,
    {
        Ok(self.inner.all(conn).await?)
    }

    /// # Errors
    /// Returns `ScopeError::Db` if the query fails.
    pub async fn one<C>(self, conn: &C) -> Result<Option<E::Model>, ScopeError>
    where
        C: ConnectionTrait,
    {
        Ok(self.inner.one(conn).await?)
    }

    /// Count matching rows. Limit and offset must not be applied yet.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the query fails.
    pub async fn count<C>(self, conn: &C) -> Result<u64, ScopeError>
    where
        C: ConnectionTrait,
        E::Model: sea_orm::FromQueryResult + Send + Sync,
    {
        Ok(self.inner.count(conn).await?)
    }

    /// Narrow to a single primary key.
    pub fn and_id(self, id: RecordId) -> Self
    where
        E: ScopableEntity,
        E::Column: ColumnTrait + Copy,
    {
        self.filter(Condition::all().add(E::id_col().eq(id)))
    }

    /// Extra filters; the permission predicate stays in place.
    pub fn filter(mut self, filter: Condition) -> Self {
        self.inner = and_where(self.inner, filter);
        self
    }

    pub fn order_by<C>(mut self, col: C, order: sea_orm::Order) -> Self
    where
        C: sea_orm::IntoSimpleExpr,
    {
        self.inner = QueryOrder::order_by(self.inner, col, order);
        self
    }

    /// Apply page bounds. `Bounds::Unbounded` leaves the query untouched.
    pub fn paginate(mut self, bounds: Bounds) -> Self {
        if let Bounds::Window { offset, limit } = bounds {
            self.inner = QuerySelect::offset(QuerySelect::limit(self.inner, limit), offset);
        }
        self
    }
}
