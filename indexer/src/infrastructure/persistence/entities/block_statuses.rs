use sea_orm::entity::prelude::*;

/// Per-block processing record for observability
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "block_statuses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub height: i32,
    #[sea_orm(column_type = "Text")]
    pub block_hash: String,
    pub tx_count: i32,
    pub event_count: i32,
    pub confirmed: bool,
    pub processed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
