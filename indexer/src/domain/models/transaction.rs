/// A transaction that produced an input lookup or a dunestone action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub id: i64,
    pub hash: String,
}
