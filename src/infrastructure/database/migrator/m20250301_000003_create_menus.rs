//! Create menus table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Menus::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Menus::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Menus::Description).string_len(500))
                    .col(ColumnDef::new(Menus::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Menus::Category).string_len(50))
                    .col(ColumnDef::new(Menus::ImageUrl).string_len(255))
                    .col(
                        ColumnDef::new(Menus::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Menus::StockQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Menus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Menus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Public listing filters on category
        manager
            .create_index(
                Index::create()
                    .name("idx_menus_category")
                    .table(Menus::Table)
                    .col(Menus::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Menus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Menus {
    Table,
    Id,
    Name,
    Description,
    Price,
    Category,
    ImageUrl,
    IsAvailable,
    StockQuantity,
    CreatedAt,
    UpdatedAt,
}
