use std::sync::Arc;

use eduadmin_db::crud::{CrudOps, InsertCommand, RemoveCommand, UpdateCommand};
use eduadmin_db::paging::{Page, PageLimits};
use eduadmin_db::search::SearchRequest;
use eduadmin_db::secure::{DataPermission, RecordId, ScopableEntity, SecureConn};
use eduadmin_security::{PermissionResolver, ResolveError, SecurityContext};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult,
    IntoActiveModel,
};
use tracing::{debug, info, instrument, warn};

use crate::domain::error::DomainError;
use crate::dto::{Validate, class_info, supplier};
use crate::infra::storage::entity::{em_class_info, em_textbook_sup};

pub type SupplierService = AdminService<em_textbook_sup::Entity, supplier::GetPageReq>;
pub type ClassInfoService = AdminService<em_class_info::Entity, class_info::GetPageReq>;

/// List / Get / Create / Update / Remove for one entity, on behalf of a caller.
///
/// The caller's [`DataPermission`] is resolved fresh on every call and never cached.
pub struct AdminService<E: EntityTrait, Q> {
    ops: CrudOps<E, Q>,
    db: SecureConn,
    resolver: Arc<PermissionResolver>,
}

impl<E, Q> AdminService<E, Q>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: FromQueryResult + IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    Q: SearchRequest + Sync,
{
    /// # Errors
    /// `DomainError::Configuration` if `E` cannot be scoped or `Q` declares an invalid search.
    pub fn new(
        db: SecureConn,
        resolver: Arc<PermissionResolver>,
        limits: PageLimits,
    ) -> Result<Self, DomainError> {
        let ops = CrudOps::new(limits)?;
        info!(table = E::default().table_name(), "admin service registered");
        Ok(Self { ops, db, resolver })
    }

    async fn permission(&self, ctx: &SecurityContext) -> Result<DataPermission, DomainError> {
        let perm = self
            .resolver
            .resolve(ctx)
            .await
            .inspect_err(|e| warn!(user_id = ctx.subject_id(), error = %e, "permission not resolved"))?;
        debug!(mode = ?perm.mode(), "permission resolved");
        Ok(perm)
    }

    /// # Errors
    /// `Permission` when the caller cannot be resolved, `Database` on storage failure.
    #[instrument(skip_all, fields(table = E::default().table_name(), user_id = ctx.subject_id()))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        req: &Q,
    ) -> Result<Page<E::Model>, DomainError> {
        let perm = self.permission(ctx).await?;
        Ok(self.ops.list(&self.db, req, &perm).await?)
    }

    /// # Errors
    /// `NotFoundOrForbidden` when the row is missing or outside the caller's scope.
    #[instrument(skip(self, ctx), fields(table = E::default().table_name(), user_id = ctx.subject_id()))]
    pub async fn get(&self, ctx: &SecurityContext, id: RecordId) -> Result<E::Model, DomainError> {
        let perm = self.permission(ctx).await?;
        Ok(self.ops.get(&self.db, id, &perm).await?)
    }

    /// Any identified caller may create; the caller becomes the row's creator.
    ///
    /// # Errors
    /// `Validation` for bad input, `Permission` for an anonymous caller.
    #[instrument(skip_all, fields(table = E::default().table_name(), user_id = ctx.subject_id()))]
    pub async fn create<R>(&self, ctx: &SecurityContext, req: &R) -> Result<RecordId, DomainError>
    where
        R: InsertCommand<E> + Validate,
    {
        if ctx.is_anonymous() {
            return Err(ResolveError::UnknownUser(ctx.subject_id()).into());
        }
        req.validate().map_err(DomainError::Validation)?;
        let id = self.ops.create(&self.db, req, ctx.subject_id()).await?;
        info!(id, "created");
        Ok(id)
    }

    /// # Errors
    /// `Validation` for bad input, `UpdateForbidden` when no row in scope was written.
    #[instrument(skip_all, fields(table = E::default().table_name(), user_id = ctx.subject_id(), id = req.id()))]
    pub async fn update<R>(&self, ctx: &SecurityContext, req: &R) -> Result<(), DomainError>
    where
        R: UpdateCommand<E> + Validate + Sync,
    {
        req.validate().map_err(DomainError::Validation)?;
        let perm = self.permission(ctx).await?;
        self.ops.update(&self.db, req, &perm).await?;
        info!("updated");
        Ok(())
    }

    /// Returns the number of rows removed.
    ///
    /// # Errors
    /// `DeleteForbidden` when none of the ids is in scope.
    #[instrument(skip_all, fields(table = E::default().table_name(), user_id = ctx.subject_id(), ids = ?req.ids()))]
    pub async fn remove<R>(&self, ctx: &SecurityContext, req: &R) -> Result<u64, DomainError>
    where
        R: RemoveCommand,
    {
        let perm = self.permission(ctx).await?;
        let removed = self.ops.remove(&self.db, req, &perm).await?;
        info!(removed, "removed");
        Ok(removed)
    }
}
