pub mod balance_repository;
pub mod dune_repository;
pub mod event_repository;
pub mod status_repository;
pub mod utxo_repository;

pub use balance_repository::BalanceRepository;
pub use dune_repository::DuneRepository;
pub use event_repository::EventRepository;
pub use status_repository::StatusRepository;
pub use utxo_repository::UtxoRepository;

use sea_orm::DatabaseConnection;

/// Read-side repositories shared by all handlers
#[derive(Clone)]
pub struct Repositories {
    pub balance: BalanceRepository,
    pub dune: DuneRepository,
    pub event: EventRepository,
    pub status: StatusRepository,
    pub utxo: UtxoRepository,
}

impl Repositories {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            balance: BalanceRepository::new(conn.clone()),
            dune: DuneRepository::new(conn.clone()),
            event: EventRepository::new(conn.clone()),
            status: StatusRepository::new(conn.clone()),
            utxo: UtxoRepository::new(conn),
        }
    }
}
