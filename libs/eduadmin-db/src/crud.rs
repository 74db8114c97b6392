//! Generic List / Get / Create / Update / Remove over any scopable entity.
//!
//! Every read and write goes through [`SecureConn`], so the permission predicate is part of
//! the same statement as the search condition and the id filter.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult,
    IntoActiveModel, Order,
};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::paging::{Page, PageLimits};
use crate::search::{SearchConfigError, SearchPlan, SearchRequest};
use crate::secure::{DataPermission, RecordId, ScopableEntity, ScopeError, SecureConn, UserId};

/// Request that produces a new row.
pub trait InsertCommand<E: EntityTrait> {
    fn generate(&self) -> E::ActiveModel;
}

/// Request that changes one existing row.
pub trait UpdateCommand<E: EntityTrait> {
    fn id(&self) -> RecordId;

    /// Changes to write, starting from the row as the caller may see it.
    fn apply(&self, current: E::Model) -> E::ActiveModel;
}

/// Request that removes a batch of rows.
pub trait RemoveCommand {
    fn ids(&self) -> &[RecordId];
}

/// Entity / request pairings that cannot be served. Raised once, at registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Search(#[from] SearchConfigError),

    #[error("entity `{entity}` declares no {column} column")]
    MissingColumn {
        entity: String,
        column: &'static str,
    },
}

/// Operation set for entity `E` searched through request type `Q`.
pub struct CrudOps<E: EntityTrait, Q> {
    plan: SearchPlan<E, Q>,
    limits: PageLimits,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait, Q> std::fmt::Debug for CrudOps<E, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudOps")
            .field("entity", &E::default().table_name())
            .field("plan", &self.plan)
            .field("limits", &self.limits)
            .finish()
    }
}

fn log_storage_error(op: &'static str, table: &str, err: &ScopeError) {
    if let ScopeError::Db(db) = err {
        error!(op, table, error = %db, "storage error");
    }
}

impl<E, Q> CrudOps<E, Q>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: FromQueryResult + IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    Q: SearchRequest,
{
    /// Check that `E` can carry every permission mode and compile the search plan for `Q`.
    ///
    /// # Errors
    /// [`RegistrationError`] if a scope column is missing or a search declaration is invalid.
    pub fn new(limits: PageLimits) -> Result<Self, RegistrationError> {
        let entity = || E::default().table_name().to_owned();
        if E::dept_col().is_none() {
            return Err(RegistrationError::MissingColumn {
                entity: entity(),
                column: "department",
            });
        }
        if E::creator_col().is_none() {
            return Err(RegistrationError::MissingColumn {
                entity: entity(),
                column: "creator",
            });
        }
        let plan = SearchPlan::<E, Q>::compile()?;
        debug!(entity = %entity(), ?plan, "registered crud operations");
        Ok(Self {
            plan,
            limits,
            _entity: PhantomData,
        })
    }

    #[must_use]
    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    fn table() -> String {
        E::default().table_name().to_owned()
    }

    /// One page of rows matching search and permission, with the unpaged total.
    ///
    /// # Errors
    /// `ScopeError::Db` on storage failure; `Misconfigured` if `perm` needs a missing column.
    #[instrument(level = "debug", skip_all, fields(table = %Self::table(), mode = ?perm.mode()))]
    pub async fn list(
        &self,
        db: &SecureConn,
        req: &Q,
        perm: &DataPermission,
    ) -> Result<Page<E::Model>, ScopeError> {
        let page = req.page();
        let base = db.find::<E>(perm)?.filter(self.plan.condition(req));

        let total = base
            .clone()
            .count(db.conn())
            .await
            .inspect_err(|e| log_storage_error("list.count", &Self::table(), e))?;

        let mut query = base;
        for (col, order) in self.plan.ordering(req) {
            query = query.order_by(col, order);
        }
        let items = query
            .order_by(E::id_col(), Order::Asc)
            .paginate(page.bounds(&self.limits))
            .all(db.conn())
            .await
            .inspect_err(|e| log_storage_error("list", &Self::table(), e))?;

        debug!(total, returned = items.len(), "list done");
        Ok(Page {
            items,
            total,
            page_index: page.page_index(),
            page_size: page.page_size(&self.limits),
        })
    }

    /// # Errors
    /// `ScopeError::NotFoundOrForbidden` whether the row is absent or outside `perm`.
    #[instrument(level = "debug", skip(self, db, perm), fields(table = %Self::table()))]
    pub async fn get(
        &self,
        db: &SecureConn,
        id: RecordId,
        perm: &DataPermission,
    ) -> Result<E::Model, ScopeError> {
        db.find_by_id::<E>(perm, id)?
            .one(db.conn())
            .await
            .inspect_err(|e| log_storage_error("get", &Self::table(), e))?
            .ok_or(ScopeError::NotFoundOrForbidden)
    }

    /// Insert with `created_by` stamped into the creator column; returns the new key.
    ///
    /// # Errors
    /// `ScopeError::Db` on storage failure.
    #[instrument(level = "debug", skip(self, db, req), fields(table = %Self::table()))]
    pub async fn create<R>(
        &self,
        db: &SecureConn,
        req: &R,
        created_by: UserId,
    ) -> Result<RecordId, ScopeError>
    where
        R: InsertCommand<E>,
    {
        let model = db
            .insert::<E>(req.generate(), created_by)
            .await
            .inspect_err(|e| log_storage_error("create", &Self::table(), e))?;
        Ok(E::id_of(&model))
    }

    /// # Errors
    /// `ScopeError::UpdateDenied` when the row is outside `perm` or the write touches no row.
    #[instrument(level = "debug", skip(self, db, req, perm), fields(table = %Self::table(), id = req.id()))]
    pub async fn update<R>(
        &self,
        db: &SecureConn,
        req: &R,
        perm: &DataPermission,
    ) -> Result<(), ScopeError>
    where
        R: UpdateCommand<E> + Sync,
    {
        db.update_with_permission::<E, _>(perm, req.id(), |current| req.apply(current))
            .await
            .inspect_err(|e| log_storage_error("update", &Self::table(), e))
    }

    /// Delete every listed id that `perm` allows; returns the number removed.
    ///
    /// # Errors
    /// `ScopeError::DeleteDenied` when nothing was removed.
    #[instrument(level = "debug", skip(self, db, req, perm), fields(table = %Self::table(), ids = ?req.ids()))]
    pub async fn remove<R>(
        &self,
        db: &SecureConn,
        req: &R,
        perm: &DataPermission,
    ) -> Result<u64, ScopeError>
    where
        R: RemoveCommand,
    {
        db.delete_by_ids::<E>(perm, req.ids())
            .await
            .inspect_err(|e| log_storage_error("remove", &Self::table(), e))
    }
}
