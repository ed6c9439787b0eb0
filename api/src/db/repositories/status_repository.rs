use sea_orm::{DatabaseConnection, EntityTrait};

use crate::db::error::DbError;
use crate::entity::bookmarks;

/// Queries over the indexer progress bookmarks
#[derive(Clone)]
pub struct StatusRepository {
    conn: DatabaseConnection,
}

impl StatusRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// One bookmark per indexed network
    pub async fn bookmarks(&self) -> Result<Vec<bookmarks::Model>, DbError> {
        Ok(bookmarks::Entity::find().all(&self.conn).await?)
    }
}
