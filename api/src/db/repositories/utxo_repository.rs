use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter};

use crate::db::error::DbError;
use crate::entity::{transactions, utxo_balances, utxos};

/// Queries over utxos and their per-utxo dune balances
#[derive(Clone)]
pub struct UtxoRepository {
    conn: DatabaseConnection,
}

impl UtxoRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Transaction row by hash
    pub async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<transactions::Model>, DbError> {
        Ok(transactions::Entity::find()
            .filter(transactions::Column::Hash.eq(hash))
            .one(&self.conn)
            .await?)
    }

    /// Utxo at `(transaction, vout)`
    pub async fn utxo_at(
        &self,
        transaction_id: i64,
        vout_index: i32,
    ) -> Result<Option<utxos::Model>, DbError> {
        Ok(utxos::Entity::find()
            .filter(utxos::Column::TransactionId.eq(transaction_id))
            .filter(utxos::Column::VoutIndex.eq(vout_index))
            .one(&self.conn)
            .await?)
    }

    /// Balance rows for one utxo
    pub async fn balances_for_utxo(
        &self,
        utxo_id: i64,
    ) -> Result<Vec<utxo_balances::Model>, DbError> {
        Ok(utxo_balances::Entity::find()
            .filter(utxo_balances::Column::UtxoId.eq(utxo_id))
            .all(&self.conn)
            .await?)
    }

    /// Balance rows for a set of utxos
    pub async fn balances_for_utxos(
        &self,
        utxo_ids: &[i64],
    ) -> Result<Vec<utxo_balances::Model>, DbError> {
        Ok(utxo_balances::Entity::find()
            .filter(utxo_balances::Column::UtxoId.is_in(utxo_ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    /// Utxos an address held at the end of `block`: created at or before it
    /// and not spent until after it
    pub async fn utxos_for_address_at(
        &self,
        address_id: i64,
        block: i32,
    ) -> Result<Vec<utxos::Model>, DbError> {
        Ok(utxos::Entity::find()
            .filter(utxos::Column::AddressId.eq(address_id))
            .filter(utxos::Column::BlockCreated.lte(block))
            .filter(
                Condition::any()
                    .add(utxos::Column::BlockSpent.is_null())
                    .add(utxos::Column::BlockSpent.gt(block)),
            )
            .all(&self.conn)
            .await?)
    }
}
