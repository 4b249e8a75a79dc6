//! Append-only history of renewals, withdrawals and balance additions.

use sea_orm_migration::prelude::*;

use crate::m20260211_000001_instruments::Instruments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InstrumentRenewals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstrumentRenewals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstrumentRenewals::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentRenewals::PreviousMaturityDate)
                            .date()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentRenewals::NewMaturityDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentRenewals::Explanation)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentRenewals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_instrument_renewals_instrument")
                            .from(InstrumentRenewals::Table, InstrumentRenewals::InstrumentId)
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InstrumentWithdrawals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstrumentWithdrawals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstrumentWithdrawals::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentWithdrawals::Amount)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentWithdrawals::Explanation)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentWithdrawals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_instrument_withdrawals_instrument")
                            .from(
                                InstrumentWithdrawals::Table,
                                InstrumentWithdrawals::InstrumentId,
                            )
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InstrumentBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstrumentBalances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstrumentBalances::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentBalances::Amount)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentBalances::Explanation)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentBalances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_instrument_balances_instrument")
                            .from(InstrumentBalances::Table, InstrumentBalances::InstrumentId)
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instrument_renewals_instrument")
                    .table(InstrumentRenewals::Table)
                    .col(InstrumentRenewals::InstrumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instrument_withdrawals_instrument")
                    .table(InstrumentWithdrawals::Table)
                    .col(InstrumentWithdrawals::InstrumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instrument_balances_instrument")
                    .table(InstrumentBalances::Table)
                    .col(InstrumentBalances::InstrumentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InstrumentBalances::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InstrumentWithdrawals::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InstrumentRenewals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InstrumentRenewals {
    #[sea_orm(iden = "instrument_renewals")]
    Table,
    Id,
    InstrumentId,
    PreviousMaturityDate,
    NewMaturityDate,
    Explanation,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InstrumentWithdrawals {
    #[sea_orm(iden = "instrument_withdrawals")]
    Table,
    Id,
    InstrumentId,
    Amount,
    Explanation,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InstrumentBalances {
    #[sea_orm(iden = "instrument_balances")]
    Table,
    Id,
    InstrumentId,
    Amount,
    Explanation,
    CreatedAt,
}
