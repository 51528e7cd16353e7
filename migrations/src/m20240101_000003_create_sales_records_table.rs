use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_sellers_table::Sellers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SalesRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SalesRecords::CreatedAt).date().not_null())
                    .col(
                        ColumnDef::new(SalesRecords::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesRecords::Status)
                            .string_len(32)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(SalesRecords::SellerId).integer().not_null())
                    // Sellers with sales must not be deletable
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_records_seller_id")
                            .from(SalesRecords::Table, SalesRecords::SellerId)
                            .to(Sellers::Table, Sellers::Id)
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
                    .name("idx_sales_records_created_at")
                    .table(SalesRecords::Table)
                    .col(SalesRecords::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sales_records_seller_id")
                    .table(SalesRecords::Table)
                    .col(SalesRecords::SellerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalesRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SalesRecords {
    Table,
    Id,
    CreatedAt,
    Amount,
    Status,
    SellerId,
}
