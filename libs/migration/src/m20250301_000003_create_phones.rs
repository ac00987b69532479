use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Phones::Table)
                    .if_not_exists()
                    .col(pk_uuid(Phones::Id))
                    .col(ColumnDef::new(Phones::UserId).uuid().not_null())
                    .col(string(Phones::Number))
                    .col(boolean(Phones::IsPrimary).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_phones_user_id")
                            .from(Phones::Table, Phones::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reconciliation looks phones up by owner on every update
        manager
            .create_index(
                Index::create()
                    .name("idx_phones_user_id")
                    .table(Phones::Table)
                    .col(Phones::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Phones::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Phones {
    Table,
    Id,
    UserId,
    Number,
    IsPrimary,
}
