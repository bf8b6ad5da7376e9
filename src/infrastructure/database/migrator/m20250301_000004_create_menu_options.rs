//! Create menu_options table

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_menus::Menus;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuOptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuOptions::MenuId).integer().not_null())
                    .col(ColumnDef::new(MenuOptions::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(MenuOptions::ExtraPrice)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MenuOptions::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MenuOptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuOptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_options_menu")
                            .from(MenuOptions::Table, MenuOptions::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_menu_options_menu")
                    .table(MenuOptions::Table)
                    .col(MenuOptions::MenuId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuOptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MenuOptions {
    Table,
    Id,
    MenuId,
    Name,
    ExtraPrice,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}
