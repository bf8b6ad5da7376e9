//! Create tables table (physical café tables)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tables::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tables::TableNumber)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tables::SeatCount).integer().not_null())
                    .col(
                        ColumnDef::new(Tables::QrCode)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tables::LocationDescription).string_len(200))
                    .col(
                        ColumnDef::new(Tables::Status)
                            .string_len(20)
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(
                        ColumnDef::new(Tables::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Tables::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tables::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Scan path looks tables up by QR code
        manager
            .create_index(
                Index::create()
                    .name("idx_tables_qr_code")
                    .table(Tables::Table)
                    .col(Tables::QrCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tables::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Tables {
    Table,
    Id,
    TableNumber,
    SeatCount,
    QrCode,
    LocationDescription,
    Status,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
