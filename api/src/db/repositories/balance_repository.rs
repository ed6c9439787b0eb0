use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::db::error::DbError;
use crate::entity::{addresses, balances};

/// Queries over addresses and their aggregate balances
#[derive(Clone)]
pub struct BalanceRepository {
    conn: DatabaseConnection,
}

impl BalanceRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Address row by its string form
    pub async fn address_by_string(
        &self,
        address: &str,
    ) -> Result<Option<addresses::Model>, DbError> {
        Ok(addresses::Entity::find()
            .filter(addresses::Column::Address.eq(address))
            .one(&self.conn)
            .await?)
    }

    /// Address rows by internal id, for event responses
    pub async fn addresses_by_ids(&self, ids: &[i64]) -> Result<Vec<addresses::Model>, DbError> {
        Ok(addresses::Entity::find()
            .filter(addresses::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?)
    }

    /// All aggregate rows for one address
    pub async fn balances_for_address(
        &self,
        address_id: i64,
    ) -> Result<Vec<balances::Model>, DbError> {
        Ok(balances::Entity::find()
            .filter(balances::Column::AddressId.eq(address_id))
            .all(&self.conn)
            .await?)
    }

}
