//! Collections and disbursements awaiting the nightly processing run.

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
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Collections::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Collections::Amount)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Collections::DepositSlip)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Collections::CheckReference)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Collections::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Collections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Collections::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collections_instrument")
                            .from(Collections::Table, Collections::InstrumentId)
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
                    .name("idx_collections_instrument")
                    .table(Collections::Table)
                    .col(Collections::InstrumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_collections_status")
                    .table(Collections::Table)
                    .col(Collections::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Disbursements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Disbursements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::InstrumentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::CheckNumber)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::DisbursementDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::Amount)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Disbursements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disbursements_instrument")
                            .from(Disbursements::Table, Disbursements::InstrumentId)
                            .to(Instruments::Table, Instruments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // check numbers are unique across every instrument
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_disbursements_check_number")
                    .table(Disbursements::Table)
                    .col(Disbursements::CheckNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_disbursements_instrument")
                    .table(Disbursements::Table)
                    .col(Disbursements::InstrumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_disbursements_status")
                    .table(Disbursements::Table)
                    .col(Disbursements::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Disbursements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Collections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Collections {
    #[sea_orm(iden = "collections")]
    Table,
    Id,
    InstrumentId,
    Amount,
    DepositSlip,
    CheckReference,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Disbursements {
    #[sea_orm(iden = "disbursements")]
    Table,
    Id,
    InstrumentId,
    CheckNumber,
    DisbursementDate,
    Amount,
    Status,
    CreatedAt,
    UpdatedAt,
}
