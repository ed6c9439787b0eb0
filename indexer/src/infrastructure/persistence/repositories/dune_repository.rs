use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, Statement};
use std::fmt;

use crate::domain::lot;
use crate::domain::models::Dune;
use crate::infrastructure::persistence::entities::dunes;
use crate::infrastructure::persistence::error::DbError;

use super::address_repository::max_id_of;
use super::{sql_opt_i64, sql_opt_str, sql_str, FLUSH_CHUNK, LOAD_CHUNK};

/// Repository for the dunes table
#[derive(Clone)]
pub struct DuneRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for DuneRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuneRepository").finish_non_exhaustive()
    }
}

impl DuneRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bulk load dunes by protocol id (`block:tx`)
    pub async fn load_by_protocol_ids(&self, ids: &[String]) -> Result<Vec<Dune>, DbError> {
        self.load_filtered(dunes::Column::DuneProtocolId, ids).await
    }

    /// Bulk load dunes by name (for etching collision checks)
    pub async fn load_by_names(&self, names: &[String]) -> Result<Vec<Dune>, DbError> {
        self.load_filtered(dunes::Column::Name, names).await
    }

    /// Bulk load dunes by internal id (for prefetched utxo balances)
    pub async fn load_by_ids(&self, ids: &[i64]) -> Result<Vec<Dune>, DbError> {
        let mut rows = Vec::new();
        for chunk in ids.chunks(LOAD_CHUNK) {
            let models = dunes::Entity::find()
                .filter(dunes::Column::Id.is_in(chunk.iter().copied()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(to_domain));
        }
        Ok(rows)
    }

    async fn load_filtered(
        &self,
        column: dunes::Column,
        keys: &[String],
    ) -> Result<Vec<Dune>, DbError> {
        let mut rows = Vec::new();
        for chunk in keys.chunks(LOAD_CHUNK) {
            let models = dunes::Entity::find()
                .filter(column.is_in(chunk.iter().cloned()))
                .all(&self.conn)
                .await?;
            rows.extend(models.into_iter().map(to_domain));
        }
        Ok(rows)
    }

    /// Highest assigned id, for seeding the in-memory id allocator
    pub async fn max_id(&self) -> Result<i64, DbError> {
        max_id_of(&self.conn, "dunes").await
    }

    /// Bulk upsert: inserts new dunes, refreshes the two monotone counters
    /// (`mints`, `burnt_amount`) on existing ones
    pub async fn flush<C: ConnectionTrait>(&self, conn: &C, rows: &[Dune]) -> Result<(), DbError> {
        for chunk in rows.chunks(FLUSH_CHUNK) {
            let values: Vec<String> = chunk.iter().map(to_values).collect();

            let sql = format!(
                "INSERT INTO dunes (id, dune_protocol_id, name, symbol, decimals, \
                 premine_0, premine_1, mints_0, mints_1, mint_cap_0, mint_cap_1, \
                 mint_amount_0, mint_amount_1, mint_start, mint_end, mint_offset_start, \
                 mint_offset_end, price_amount, price_pay_to, turbo, unmintable, \
                 burnt_amount_0, burnt_amount_1, etch_transaction_id, deployer_address_id) \
                 VALUES {} ON CONFLICT (id) DO UPDATE SET \
                 mints_0 = EXCLUDED.mints_0, mints_1 = EXCLUDED.mints_1, \
                 burnt_amount_0 = EXCLUDED.burnt_amount_0, burnt_amount_1 = EXCLUDED.burnt_amount_1",
                values.join(", ")
            );

            conn.execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::QueryError(e.to_string()))?;
        }
        Ok(())
    }
}

fn to_values(d: &Dune) -> String {
    let (premine_0, premine_1) = lot::split_u128(d.premine);
    let (mints_0, mints_1) = lot::split_u128(d.mints);
    let (burnt_0, burnt_1) = lot::split_u128(d.burnt_amount);
    let (cap_0, cap_1) = match d.mint_cap {
        Some(cap) => {
            let (low, high) = lot::split_u128(cap);
            (Some(low), Some(high))
        }
        None => (None, None),
    };
    let (amount_0, amount_1) = match d.mint_amount {
        Some(amount) => {
            let (low, high) = lot::split_u128(amount);
            (Some(low), Some(high))
        }
        None => (None, None),
    };

    format!(
        "({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
        d.id,
        sql_str(&d.dune_protocol_id),
        sql_str(&d.name),
        sql_opt_str(d.symbol.as_deref()),
        d.decimals as i16,
        premine_0,
        premine_1,
        mints_0,
        mints_1,
        sql_opt_i64(cap_0),
        sql_opt_i64(cap_1),
        sql_opt_i64(amount_0),
        sql_opt_i64(amount_1),
        sql_opt_i64(d.mint_start.map(i64::from)),
        sql_opt_i64(d.mint_end.map(i64::from)),
        sql_opt_i64(d.mint_offset_start.map(i64::from)),
        sql_opt_i64(d.mint_offset_end.map(i64::from)),
        sql_opt_i64(d.price_amount.map(|v| v as i64)),
        sql_opt_str(d.price_pay_to.as_deref()),
        d.turbo,
        d.unmintable,
        burnt_0,
        burnt_1,
        d.etch_transaction_id,
        d.deployer_address_id,
    )
}

fn to_domain(model: dunes::Model) -> Dune {
    Dune {
        id: model.id,
        dune_protocol_id: model.dune_protocol_id,
        name: model.name,
        symbol: model.symbol,
        decimals: model.decimals as u8,
        premine: lot::join_u128(model.premine_0, model.premine_1),
        mints: lot::join_u128(model.mints_0, model.mints_1),
        mint_cap: match (model.mint_cap_0, model.mint_cap_1) {
            (Some(low), Some(high)) => Some(lot::join_u128(low, high)),
            _ => None,
        },
        mint_amount: match (model.mint_amount_0, model.mint_amount_1) {
            (Some(low), Some(high)) => Some(lot::join_u128(low, high)),
            _ => None,
        },
        mint_start: model.mint_start.map(|v| v as u32),
        mint_end: model.mint_end.map(|v| v as u32),
        mint_offset_start: model.mint_offset_start.map(|v| v as u32),
        mint_offset_end: model.mint_offset_end.map(|v| v as u32),
        price_amount: model.price_amount.map(|v| v as u64),
        price_pay_to: model.price_pay_to,
        turbo: model.turbo,
        unmintable: model.unmintable,
        burnt_amount: lot::join_u128(model.burnt_amount_0, model.burnt_amount_1),
        etch_transaction_id: model.etch_transaction_id,
        deployer_address_id: model.deployer_address_id,
    }
}
