use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmTextbookSup::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmTextbookSup::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmTextbookSup::Name).string().not_null())
                    .col(ColumnDef::new(EmTextbookSup::Contact).string().not_null().default(""))
                    .col(ColumnDef::new(EmTextbookSup::Phone).string().not_null().default(""))
                    .col(ColumnDef::new(EmTextbookSup::Address).string().not_null().default(""))
                    .col(ColumnDef::new(EmTextbookSup::Status).string().not_null().default(""))
                    .col(ColumnDef::new(EmTextbookSup::Remark).string().not_null().default(""))
                    .col(ColumnDef::new(EmTextbookSup::DeptId).integer().not_null())
                    .col(ColumnDef::new(EmTextbookSup::CreateBy).integer().not_null())
                    .col(ColumnDef::new(EmTextbookSup::UpdateBy).integer().not_null())
                    .col(
                        ColumnDef::new(EmTextbookSup::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmTextbookSup::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_em_textbook_sup_dept_id")
                    .table(EmTextbookSup::Table)
                    .col(EmTextbookSup::DeptId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmClassInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmClassInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmClassInfo::ClassName).string().not_null())
                    .col(ColumnDef::new(EmClassInfo::Grade).string().not_null().default(""))
                    .col(ColumnDef::new(EmClassInfo::HeadTeacher).string().not_null().default(""))
                    .col(ColumnDef::new(EmClassInfo::StudentCount).integer().not_null().default(0))
                    .col(ColumnDef::new(EmClassInfo::Status).string().not_null().default(""))
                    .col(ColumnDef::new(EmClassInfo::DeptId).integer().not_null())
                    .col(ColumnDef::new(EmClassInfo::CreateBy).integer().not_null())
                    .col(ColumnDef::new(EmClassInfo::UpdateBy).integer().not_null())
                    .col(
                        ColumnDef::new(EmClassInfo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmClassInfo::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_em_class_info_dept_id")
                    .table(EmClassInfo::Table)
                    .col(EmClassInfo::DeptId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmClassInfo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmTextbookSup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmTextbookSup {
    Table,
    Id,
    Name,
    Contact,
    Phone,
    Address,
    Status,
    Remark,
    DeptId,
    CreateBy,
    UpdateBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmClassInfo {
    Table,
    Id,
    ClassName,
    Grade,
    HeadTeacher,
    StudentCount,
    Status,
    DeptId,
    CreateBy,
    UpdateBy,
    CreatedAt,
    UpdatedAt,
}
