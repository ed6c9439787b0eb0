/// Aggregate balance of one dune on one address. The row is kept when the
/// balance passes through zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub id: i64,
    pub address_id: i64,
    pub dune_id: i64,
    pub balance: u128,
}
