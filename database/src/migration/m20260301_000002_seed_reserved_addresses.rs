use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seeds the three process-reserved address rows: 1 = COINBASE/GENESIS,
/// 2 = OP_RETURN burn sink, 3 = UNKNOWN.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let connection = manager.get_connection();
        connection
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "INSERT INTO addresses (id, address) VALUES \
                 (1, 'COINBASE'), (2, 'OP_RETURN'), (3, 'UNKNOWN') \
                 ON CONFLICT (id) DO NOTHING"
                    .to_string(),
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let connection = manager.get_connection();
        connection
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "DELETE FROM addresses WHERE id IN (1, 2, 3)".to_string(),
            ))
            .await?;
        Ok(())
    }
}
