use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "utxo_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub utxo_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dune_id: i64,
    pub balance_0: i64,
    pub balance_1: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
