//! Store adapter: bulk reads and bulk upserts per entity, plus the single
//! transactional boundary that commits one block atomically.

pub mod address_repository;
pub mod balance_repository;
pub mod block_status_repository;
pub mod bookmark_repository;
pub mod dune_repository;
pub mod event_repository;
pub mod transaction_repository;
pub mod utxo_balance_repository;
pub mod utxo_repository;

pub use address_repository::AddressRepository;
pub use balance_repository::BalanceRepository;
pub use block_status_repository::BlockStatusRepository;
pub use bookmark_repository::BookmarkRepository;
pub use dune_repository::DuneRepository;
pub use event_repository::EventRepository;
pub use transaction_repository::TransactionRepository;
pub use utxo_balance_repository::UtxoBalanceRepository;
pub use utxo_repository::UtxoRepository;

use sea_orm::TransactionTrait;

use crate::infrastructure::persistence::block_cache::BlockFlush;
use crate::infrastructure::persistence::error::DbError;

/// Rows per batched INSERT statement
pub(crate) const FLUSH_CHUNK: usize = 500;

/// Rows per `IN` expansion on bulk reads
pub(crate) const LOAD_CHUNK: usize = 500;

/// SQL literal for a text value
pub(crate) fn sql_str(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// SQL literal for a nullable text value
pub(crate) fn sql_opt_str(s: Option<&str>) -> String {
    match s {
        Some(s) => sql_str(s),
        None => "NULL".to_string(),
    }
}

/// SQL literal for a nullable integer value
pub(crate) fn sql_opt_i64(v: Option<i64>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "NULL".to_string(),
    }
}

/// One repository per entity, sharing a connection pool
#[derive(Clone, Debug)]
pub struct Repositories {
    pub address: AddressRepository,
    pub transaction: TransactionRepository,
    pub utxo: UtxoRepository,
    pub utxo_balance: UtxoBalanceRepository,
    pub dune: DuneRepository,
    pub balance: BalanceRepository,
    pub event: EventRepository,
    pub bookmark: BookmarkRepository,
    pub block_status: BlockStatusRepository,
}

impl Repositories {
    /// Flush one processed block in a single transaction, in foreign-key
    /// order, bookmark included. Either everything lands or nothing does.
    pub async fn flush_block(
        &self,
        conn: &sea_orm::DatabaseConnection,
        flush: &BlockFlush,
    ) -> Result<(), DbError> {
        let txn = conn.begin().await?;

        self.address.flush(&txn, &flush.addresses).await?;
        self.dune.flush(&txn, &flush.dunes).await?;
        self.transaction.flush(&txn, &flush.transactions).await?;
        self.utxo.flush(&txn, &flush.utxos).await?;
        self.utxo_balance.flush(&txn, &flush.utxo_balances).await?;
        self.balance.flush(&txn, &flush.balances).await?;
        self.event.flush(&txn, &flush.events).await?;
        self.bookmark
            .save(&txn, &flush.network, &flush.block_hash, flush.height, flush.confirmed)
            .await?;

        txn.commit().await?;
        Ok(())
    }
}
