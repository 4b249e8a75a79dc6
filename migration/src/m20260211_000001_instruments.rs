//! Instruments table.
//!
//! Every instrument kind shares one table; `kind` holds the URL slug of
//! the kind and `account_number` is unique within a kind.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Instruments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instruments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Instruments::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(Instruments::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Instruments::AccountNumber)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Instruments::BeginningBalance)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Instruments::Collection)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Instruments::CollectionDate).date().null())
                    .col(
                        ColumnDef::new(Instruments::Disbursement)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Instruments::DisbursementDate).date().null())
                    .col(
                        ColumnDef::new(Instruments::EndingBalance)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Instruments::MaturityDate).date().null())
                    .col(ColumnDef::new(Instruments::AcquisitionDate).date().null())
                    .col(ColumnDef::new(Instruments::Explanation).text().null())
                    .col(
                        ColumnDef::new(Instruments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Instruments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instruments_kind_account")
                    .table(Instruments::Table)
                    .col(Instruments::Kind)
                    .col(Instruments::AccountNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // report query: kind + maturity_date IS NOT NULL
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instruments_kind_maturity")
                    .table(Instruments::Table)
                    .col(Instruments::Kind)
                    .col(Instruments::MaturityDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_instruments_kind_maturity").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_instruments_kind_account").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Instruments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Instruments {
    #[sea_orm(iden = "instruments")]
    Table,
    Id,
    Kind,
    Name,
    AccountNumber,
    BeginningBalance,
    Collection,
    CollectionDate,
    Disbursement,
    DisbursementDate,
    EndingBalance,
    MaturityDate,
    AcquisitionDate,
    Explanation,
    CreatedAt,
    UpdatedAt,
}
