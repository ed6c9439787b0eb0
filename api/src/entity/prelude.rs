pub use super::addresses::Entity as Addresses;
pub use super::balances::Entity as Balances;
pub use super::bookmarks::Entity as Bookmarks;
pub use super::dunes::Entity as Dunes;
pub use super::events::Entity as Events;
pub use super::transactions::Entity as Transactions;
pub use super::utxo_balances::Entity as UtxoBalances;
pub use super::utxos::Entity as Utxos;
