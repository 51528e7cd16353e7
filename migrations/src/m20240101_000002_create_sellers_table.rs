use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_departments_table::Departments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sellers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sellers::Name).string_len(60).not_null())
                    .col(ColumnDef::new(Sellers::Email).string().not_null())
                    .col(ColumnDef::new(Sellers::BirthDate).date().not_null())
                    .col(
                        ColumnDef::new(Sellers::BaseSalary)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sellers::DepartmentId).integer().not_null())
                    .col(
                        ColumnDef::new(Sellers::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sellers_department_id")
                            .from(Sellers::Table, Sellers::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sellers_department_id")
                    .table(Sellers::Table)
                    .col(Sellers::DepartmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sellers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Sellers {
    Table,
    Id,
    Name,
    Email,
    BirthDate,
    BaseSalary,
    DepartmentId,
    Version,
}
