use crate::infrastructure::persistence::repositories::{
    AddressRepository, BalanceRepository, BlockStatusRepository, BookmarkRepository,
    DuneRepository, EventRepository, Repositories, TransactionRepository, UtxoBalanceRepository,
    UtxoRepository,
};
use crate::infrastructure::persistence::DbPool;

/// Creates repository instances sharing the pool's connection
pub struct RepositoryFactory;

impl RepositoryFactory {
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.get_connection().clone();

        Repositories {
            address: AddressRepository::new(conn.clone()),
            transaction: TransactionRepository::new(conn.clone()),
            utxo: UtxoRepository::new(conn.clone()),
            utxo_balance: UtxoBalanceRepository::new(conn.clone()),
            dune: DuneRepository::new(conn.clone()),
            balance: BalanceRepository::new(conn.clone()),
            event: EventRepository::new(conn.clone()),
            bookmark: BookmarkRepository::new(conn.clone()),
            block_status: BlockStatusRepository::new(conn),
        }
    }
}
