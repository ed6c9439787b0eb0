//! Response shapes for the query surface. Balance maps are keyed by dune
//! protocol id so an empty result serializes as `{}`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Balance maps: dune protocol id -> entry
pub type BalanceMap = BTreeMap<String, BalanceEntry>;

#[derive(Debug, Clone, Serialize)]
pub struct BalanceEntry {
    pub name: String,
    pub symbol: Option<String>,
    pub decimals: i16,
    /// Decimal string; balances span the full u128 range
    pub balance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuneResponse {
    pub dune_protocol_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub decimals: i16,
    pub premine: String,
    pub mints: String,
    pub mint_cap: Option<String>,
    pub mint_amount: Option<String>,
    pub mint_start: Option<i32>,
    pub mint_end: Option<i32>,
    pub mint_offset_start: Option<i32>,
    pub mint_offset_end: Option<i32>,
    pub price_amount: Option<i64>,
    pub price_pay_to: Option<String>,
    pub turbo: bool,
    pub unmintable: bool,
    pub burnt_amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuneListResponse {
    pub total: u64,
    pub dunes: Vec<DuneResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub event_type: String,
    pub block: i32,
    pub dune_protocol_id: String,
    pub amount: String,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
}

/// Recombine a persisted `(low, high)` i64 pair into the u128 it encodes
pub fn join_u128(low: i64, high: i64) -> u128 {
    ((high as u64 as u128) << 64) | (low as u64 as u128)
}

/// Event type discriminant -> wire name
pub fn event_type_name(discriminant: i16) -> &'static str {
    match discriminant {
        0 => "ETCH",
        1 => "MINT",
        2 => "TRANSFER",
        3 => "BURN",
        _ => "UNKNOWN",
    }
}
