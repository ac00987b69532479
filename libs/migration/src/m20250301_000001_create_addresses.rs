use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One address per user, enforced by the unique user_id
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(pk_uuid(Addresses::Id))
                    .col(
                        ColumnDef::new(Addresses::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(string(Addresses::Street))
                    .col(string(Addresses::Number))
                    .col(string(Addresses::PostalCode))
                    .col(string(Addresses::City))
                    .col(string(Addresses::Country))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_addresses_user_id")
                            .from(Addresses::Table, Addresses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Addresses {
    Table,
    Id,
    UserId,
    Street,
    Number,
    PostalCode,
    City,
    Country,
}
