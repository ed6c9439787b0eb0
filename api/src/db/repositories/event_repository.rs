use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::db::error::DbError;
use crate::entity::events;

/// Queries over the audit log
#[derive(Clone)]
pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Events a transaction emitted, in emission order
    pub async fn events_for_transaction(
        &self,
        transaction_id: i64,
    ) -> Result<Vec<events::Model>, DbError> {
        Ok(events::Entity::find()
            .filter(events::Column::TransactionId.eq(transaction_id))
            .order_by_asc(events::Column::Id)
            .all(&self.conn)
            .await?)
    }
}
