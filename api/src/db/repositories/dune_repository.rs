use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect};

use crate::db::error::DbError;
use crate::entity::dunes;

/// Queries over etched dunes
#[derive(Clone)]
pub struct DuneRepository {
    conn: DatabaseConnection,
}

impl DuneRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Dune by its `block:tx` protocol id
    pub async fn by_protocol_id(
        &self,
        protocol_id: &str,
    ) -> Result<Option<dunes::Model>, DbError> {
        Ok(dunes::Entity::find()
            .filter(dunes::Column::DuneProtocolId.eq(protocol_id))
            .one(&self.conn)
            .await?)
    }

    /// Dunes by internal id
    pub async fn by_ids(&self, ids: &[i64]) -> Result<Vec<dunes::Model>, DbError> {
        Ok(dunes::Entity::find()
            .filter(dunes::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    /// Etched dunes, oldest first
    pub async fn list(&self, limit: u64, offset: u64) -> Result<Vec<dunes::Model>, DbError> {
        Ok(dunes::Entity::find()
            .order_by_asc(dunes::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    /// Total number of etched dunes
    pub async fn count(&self) -> Result<u64, DbError> {
        Ok(dunes::Entity::find().count(&self.conn).await?)
    }
}
