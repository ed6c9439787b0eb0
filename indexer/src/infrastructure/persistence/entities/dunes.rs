use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dunes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    #[sea_orm(unique, column_type = "Text")]
    pub dune_protocol_id: String,
    #[sea_orm(unique, column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub symbol: Option<String>,
    pub decimals: i16,
    pub premine_0: i64,
    pub premine_1: i64,
    pub mints_0: i64,
    pub mints_1: i64,
    pub mint_cap_0: Option<i64>,
    pub mint_cap_1: Option<i64>,
    pub mint_amount_0: Option<i64>,
    pub mint_amount_1: Option<i64>,
    pub mint_start: Option<i32>,
    pub mint_end: Option<i32>,
    pub mint_offset_start: Option<i32>,
    pub mint_offset_end: Option<i32>,
    pub price_amount: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub price_pay_to: Option<String>,
    pub turbo: bool,
    pub unmintable: bool,
    pub burnt_amount_0: i64,
    pub burnt_amount_1: i64,
    pub etch_transaction_id: i64,
    pub deployer_address_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
