use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "instruments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub account_number: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub beginning_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub collection: Decimal,
    pub collection_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub disbursement: Decimal,
    pub disbursement_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub ending_balance: Decimal,
    pub maturity_date: Option<Date>,
    pub acquisition_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub explanation: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
