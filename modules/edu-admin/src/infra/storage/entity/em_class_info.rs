use eduadmin_db::secure::Scopable;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable, Serialize)]
#[sea_orm(table_name = "em_class_info")]
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
    pub class_name: String,
    pub grade: String,
    pub head_teacher: String,
    pub student_count: i32,
    pub status: String,
    pub dept_id: i32,
    pub create_by: i32,
    pub update_by: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
