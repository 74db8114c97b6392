use clap::Subcommand;
use edu_admin::AdminService;
use edu_admin::dto::Validate;
use eduadmin_db::crud::{InsertCommand, RemoveCommand, UpdateCommand};
use eduadmin_db::search::SearchRequest;
use eduadmin_db::secure::{RecordId, ScopableEntity};
use eduadmin_security::SecurityContext;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult,
    IntoActiveModel,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Operations available on each entity. Payloads are JSON objects in the request shape.
#[derive(Debug, Clone, Subcommand)]
pub enum EntityAction {
    /// One page of rows, e.g. `--query '{"status":"1","pageIndex":2}'`
    List {
        #[arg(long, default_value = "{}")]
        query: String,
    },
    /// One row by id
    Get { id: RecordId },
    /// Insert a row; prints the new id
    Create {
        #[arg(long)]
        data: String,
    },
    /// Replace the editable fields of a row; `data` must contain `id`
    Update {
        #[arg(long)]
        data: String,
    },
    /// Remove rows by id; prints the number removed
    Delete {
        #[arg(required = true)]
        ids: Vec<RecordId>,
    },
}

fn parse<T: DeserializeOwned>(what: &str, raw: &str) -> anyhow::Result<T> {
    serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("invalid {what} payload: {e}"))
}

/// Run `action` against `service`. `I` and `U` are the entity's insert and update requests.
///
/// # Errors
/// Payload errors as `anyhow`; operation failures as a wrapped `DomainError`.
pub async fn run_entity<E, Q, I, U>(
    service: &AdminService<E, Q>,
    ctx: &SecurityContext,
    action: EntityAction,
) -> anyhow::Result<Value>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
    E::Model: FromQueryResult + IntoActiveModel<E::ActiveModel> + Serialize + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    Q: SearchRequest + DeserializeOwned + Sync,
    I: InsertCommand<E> + Validate + DeserializeOwned,
    U: UpdateCommand<E> + Validate + DeserializeOwned + Sync,
{
    Ok(match action {
        EntityAction::List { query } => {
            let req: Q = parse("query", &query)?;
            serde_json::to_value(service.list(ctx, &req).await?)?
        }
        EntityAction::Get { id } => serde_json::to_value(service.get(ctx, id).await?)?,
        EntityAction::Create { data } => {
            let req: I = parse("create", &data)?;
            json!({ "id": service.create(ctx, &req).await? })
        }
        EntityAction::Update { data } => {
            let req: U = parse("update", &data)?;
            service.update(ctx, &req).await?;
            json!({ "id": req.id(), "updated": true })
        }
        EntityAction::Delete { ids } => {
            let removed = service.remove(ctx, &Ids(ids)).await?;
            json!({ "removed": removed })
        }
    })
}

struct Ids(Vec<RecordId>);

impl RemoveCommand for Ids {
    fn ids(&self) -> &[RecordId] {
        &self.0
    }
}
