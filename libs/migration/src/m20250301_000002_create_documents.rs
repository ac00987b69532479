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
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(pk_uuid(Documents::Id))
                    .col(
                        ColumnDef::new(Documents::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(string(Documents::Rg))
                    .col(string(Documents::Cpf))
                    .col(ColumnDef::new(Documents::OtherInfo).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_user_id")
                            .from(Documents::Table, Documents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    UserId,
    Rg,
    Cpf,
    OtherInfo,
}
