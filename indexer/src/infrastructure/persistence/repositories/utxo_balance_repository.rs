use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement};
use std::fmt;

use crate::domain::lot;
use crate::domain::models::UtxoBalance;
use crate::infrastructure::persistence::entities::utxo_balances;
use crate::infrastructure::persistence::error::DbError;

use super::{FLUSH_CHUNK, LOAD_CHUNK};

/// Repository for the utxo_balances table
#[derive(Clone)]
pub struct UtxoBalanceRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for UtxoBalanceRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtxoBalanceRepository")
            .finish_non_exhaustive()
    }
}

impl UtxoBalanceRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk load balance rows for a set of utxos
    pub async fn load_by_utxo_ids(&self, utxo_ids: &[i64]) -> Result<Vec<UtxoBalance>, DbError> {
        let mut rows = Vec::new();
        for chunk in utxo_ids.chunks(LOAD_CHUNK) {
            let models = utxo_balances::Entity::find()
                .filter(utxo_balances::Column::UtxoId.is_in(chunk.iter().copied()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(|m| UtxoBalance {
                utxo_id: m.utxo_id,
                dune_id: m.dune_id,
                balance: lot::join_u128(m.balance_0, m.balance_1),
            }));
        }
        Ok(rows)
    }

    /// Bulk insert balance rows; rows are immutable once created
    pub async fn flush<C: ConnectionTrait>(
        &self,
        conn: &C,
        rows: &[UtxoBalance],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk
                .iter()
                .map(|b| {
                    let (low, high) = lot::split_u128(b.balance);
                    format!("({}, {}, {}, {})", b.utxo_id, b.dune_id, low, high)
                })
                .collect();

            let sql = format!(
                "INSERT INTO utxo_balances (utxo_id, dune_id, balance_0, balance_1) VALUES {} \
                 ON CONFLICT (utxo_id, dune_id) DO NOTHING",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}
