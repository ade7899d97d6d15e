use sea_orm_migration::prelude::*;

use crate::m20260620_090000_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Contributions {
    Table,
    Id,
    UserId,
    Month,
    Year,
    AmountDueMinor,
    AmountPaidMinor,
    Status,
    DueDate,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contributions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contributions::UserId).string().not_null())
                    .col(ColumnDef::new(Contributions::Month).integer().not_null())
                    .col(ColumnDef::new(Contributions::Year).integer().not_null())
                    .col(
                        ColumnDef::new(Contributions::AmountDueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::AmountPaidMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Contributions::Status).string().not_null())
                    .col(ColumnDef::new(Contributions::DueDate).timestamp().not_null())
                    .col(ColumnDef::new(Contributions::PaidAt).timestamp())
                    .col(
                        ColumnDef::new(Contributions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contributions-user_id")
                            .from(Contributions::Table, Contributions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The natural key: one obligation per member per period. Enforced
        // here so concurrent generator runs cannot double-bill.
        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-natural-key")
                    .table(Contributions::Table)
                    .col(Contributions::UserId)
                    .col(Contributions::Month)
                    .col(Contributions::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-status-due_date")
                    .table(Contributions::Table)
                    .col(Contributions::Status)
                    .col(Contributions::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contributions::Table).to_owned())
            .await?;
        Ok(())
    }
}
