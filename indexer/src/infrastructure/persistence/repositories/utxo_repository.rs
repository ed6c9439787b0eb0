use sea_orm::{Condition, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, QueryFilter, Statement};
use std::fmt;

use crate::domain::models::Utxo;
use crate::infrastructure::persistence::entities::utxos;
use crate::infrastructure::persistence::error::DbError;

use super::address_repository::max_id_of;
use super::{sql_opt_i64, FLUSH_CHUNK, LOAD_CHUNK};

/// Repository for the utxos table
#[derive(Clone)]
pub struct UtxoRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for UtxoRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtxoRepository").finish_non_exhaustive()
    }
}

impl UtxoRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk load utxo rows by natural key `(transaction_id, vout_index)`
    pub async fn load_by_locations(
        &self,
        locations: &[(i64, i32)],
    ) -> Result<Vec<Utxo>, DbError> {
        let mut rows = Vec::new();
        for chunk in locations.chunks(LOAD_CHUNK) {
            let mut condition = Condition::any();
            for (transaction_id, vout_index) in chunk {
                condition = condition.add(
                    Condition::all()
                        .add(utxos::Column::TransactionId.eq(*transaction_id))
                        .add(utxos::Column::VoutIndex.eq(*vout_index)),
                );
            }
            let models = utxos::Entity::find()
                .filter(condition)
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(to_domain));
        }
        Ok(rows)
    }

    /// Highest assigned id, for seeding the in-memory id allocator
    pub async fn max_id(&self) -> Result<i64, DbError> {
        max_id_of(&self.conn, "utxos").await
    }

    /// Bulk upsert: inserts new utxos, updates the spend marker on existing
    /// ones. Only `block_spent` and `transaction_spent_id` ever change.
    pub async fn flush<C: ConnectionTrait>(&self, conn: &C, rows: &[Utxo]) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk
                .iter()
                .map(|u| {
                    format!(
                        "({}, {}, {}, {}, {}, {}, {}, {})",
                        u.id,
                        u.transaction_id,
                        u.vout_index,
                        u.address_id,
                        u.value_sats as i64,
                        u.block_created as i32,
                        sql_opt_i64(u.block_spent.map(i64::from)),
                        sql_opt_i64(u.transaction_spent_id),
                    )
                })
                .collect();

            let sql = format!(
                "INSERT INTO utxos (id, transaction_id, vout_index, address_id, value_sats, \
                 block_created, block_spent, transaction_spent_id) VALUES {} \
                 ON CONFLICT (id) DO UPDATE SET block_spent = EXCLUDED.block_spent, \
                 transaction_spent_id = EXCLUDED.transaction_spent_id",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}

fn to_domain(model: utxos::Model) -> Utxo {
    Utxo {
        id: model.id,
        transaction_id: model.transaction_id,
        vout_index: model.vout_index,
        address_id: model.address_id,
        value_sats: model.value_sats as u64,
        block_created: model.block_created as u32,
        block_spent: model.block_spent.map(|b| b as u32),
        transaction_spent_id: model.transaction_spent_id,
    }
}
