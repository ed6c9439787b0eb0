use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// 0 = ETCH, 1 = MINT, 2 = TRANSFER, 3 = BURN
    pub event_type: i16,
    pub block: i32,
    pub transaction_id: i64,
    pub dune_id: i64,
    pub amount_0: i64,
    pub amount_1: i64,
    pub from_address_id: i64,
    pub to_address_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
