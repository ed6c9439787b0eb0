pub mod block_cache;
pub mod connection;
pub mod entities;
pub mod error;
pub mod factory;
pub mod repositories;

pub use block_cache::{BlockCache, Lookup, NextIds};
pub use connection::DbPool;
pub use error::DbError;
pub use factory::RepositoryFactory;
pub use repositories::Repositories;
