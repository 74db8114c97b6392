use eduadmin_db::secure::Scopable;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Textbook supplier.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable, Serialize)]
#[sea_orm(table_name = "em_textbook_sup")]
#[secure(
    id_col = "id",
    dept_col = "dept_id",
    creator_col = "create_by",
    updater_col = "update_by"
)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub address: String,
    pub status: String,
    pub remark: String,
    pub dept_id: i32,
    pub create_by: i32,
    pub update_by: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
