/// A Bitcoin address, created on first sight and never deleted.
/// Rows 1..=3 are process-reserved sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: i64,
    pub address: String,
}
