#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use eduadmin_db::{ConnectOpts, DbHandle};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Schema, Set};

pub mod note {
    use eduadmin_db::secure::Scopable;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
    #[sea_orm(table_name = "note")]
    #[secure(
        id_col = "id",
        dept_col = "dept_id",
        creator_col = "create_by",
        updater_col = "update_by"
    )]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        pub status: String,
        pub score: i32,
        pub dept_id: i32,
        pub create_by: i32,
        pub update_by: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Entity with no owner columns; only `all` permissions can be applied to it.
pub mod audit_log {
    use eduadmin_db::secure::Scopable;
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Scopable)]
    #[sea_orm(table_name = "audit_log")]
    #[secure(id_col = "id", no_dept, no_creator, no_updater)]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub message: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub async fn memory_db() -> DbHandle {
    let opts = ConnectOpts {
        max_conns: Some(1),
        ..Default::default()
    };
    let db = DbHandle::connect("sqlite::memory:", opts)
        .await
        .expect("Failed to connect to database");
    let backend = db.conn().get_database_backend();
    let schema = Schema::new(backend);
    db.conn()
        .execute(backend.build(&schema.create_table_from_entity(note::Entity)))
        .await
        .expect("Failed to create note table");
    db.conn()
        .execute(backend.build(&schema.create_table_from_entity(audit_log::Entity)))
        .await
        .expect("Failed to create audit_log table");
    db
}

pub async fn seed(db: &DbHandle, title: &str, status: &str, score: i32, dept_id: i32, create_by: i32) -> note::Model {
    note::ActiveModel {
        title: Set(title.to_owned()),
        status: Set(status.to_owned()),
        score: Set(score),
        dept_id: Set(dept_id),
        create_by: Set(create_by),
        update_by: Set(create_by),
        ..Default::default()
    }
    .insert(db.conn())
    .await
    .expect("Failed to seed note")
}

pub async fn fetch_raw(db: &DbHandle, id: i32) -> Option<note::Model> {
    note::Entity::find_by_id(id).one(db.conn()).await.unwrap()
}
