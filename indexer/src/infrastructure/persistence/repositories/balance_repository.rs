use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement};
use std::fmt;

use crate::domain::lot;
use crate::domain::models::Balance;
use crate::infrastructure::persistence::entities::balances;
use crate::infrastructure::persistence::error::DbError;

use super::address_repository::max_id_of;
use super::{FLUSH_CHUNK, LOAD_CHUNK};

/// Repository for the balances table (address aggregates)
#[derive(Clone)]
pub struct BalanceRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for BalanceRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalanceRepository").finish_non_exhaustive()
    }
}

impl BalanceRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk load aggregate rows for a set of addresses
    pub async fn load_by_address_ids(&self, address_ids: &[i64]) -> Result<Vec<Balance>, DbError> {
        let mut rows = Vec::new();
        for chunk in address_ids.chunks(LOAD_CHUNK) {
            let models = balances::Entity::find()
                .filter(balances::Column::AddressId.is_in(chunk.iter().copied()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(|m| Balance {
                id: m.id,
                address_id: m.address_id,
                dune_id: m.dune_id,
                balance: lot::join_u128(m.balance_0, m.balance_1),
            }));
        }
        Ok(rows)
    }

    /// Highest assigned id, for seeding the in-memory id allocator
    pub async fn max_id(&self) -> Result<i64, DbError> {
        max_id_of(&self.conn, "balances").await
    }

    /// Bulk upsert aggregates; the balance value is the only mutable column
    pub async fn flush<C: ConnectionTrait>(
        &self,
        conn: &C,
        rows: &[Balance],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk
                .iter()
                .map(|b| {
                    let (low, high) = lot::split_u128(b.balance);
                    format!(
                        "({}, {}, {}, {}, {})",
                        b.id, b.address_id, b.dune_id, low, high
                    )
                })
                .collect();

            let sql = format!(
                "INSERT INTO balances (id, address_id, dune_id, balance_0, balance_1) VALUES {} \
                 ON CONFLICT (address_id, dune_id) DO UPDATE SET \
                 balance_0 = EXCLUDED.balance_0, balance_1 = EXCLUDED.balance_1",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}
