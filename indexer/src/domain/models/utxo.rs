/// A transaction output carrying dune balances. Only dune-bearing outputs
/// are persisted; the row is immutable except for the spend marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub id: i64,
    pub transaction_id: i64,
    pub vout_index: i32,
    pub address_id: i64,
    pub value_sats: u64,
    pub block_created: u32,
    pub block_spent: Option<u32>,
    pub transaction_spent_id: Option<i64>,
}

impl Utxo {
    pub fn is_spent(&self) -> bool {
        self.block_spent.is_some()
    }
}

/// Balance of one dune on one UTXO; rows exist only while non-zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoBalance {
    pub utxo_id: i64,
    pub dune_id: i64,
    pub balance: u128,
}
