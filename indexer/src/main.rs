//! Dunes Indexer - Bitcoin blockchain indexer for the Dunes token protocol
//!
//! Watches the chain from the protocol genesis height, decodes dunestones
//! from OP_RETURN outputs, and maintains the UTXO and address ledgers in
//! Postgres. Run the `dunes-database` CLI first to create the schema.

use dunes_indexer::application::indexer::BlockProcessor;
use dunes_indexer::config::AppConfig;
use dunes_indexer::infrastructure::bitcoin::BitcoinClient;
use dunes_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use dunes_indexer::utils::logging;

#[tokio::main]
async fn main() {
    logging::init_logger();

    let config = AppConfig::from_env();

    let db_pool = match DbPool::new(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            logging::log_error(&format!("Failed to connect to database: {}", e));
            return;
        }
    };
    let repositories = RepositoryFactory::create_repositories(&db_pool);

    let bitcoin_client = match BitcoinClient::new(&config.bitcoin) {
        Ok(client) => client,
        Err(e) => {
            logging::log_error(&format!("Failed to connect to Bitcoin RPC: {}", e));
            return;
        }
    };

    let conn = db_pool.get_connection().clone();
    let mut processor = BlockProcessor::new(config, bitcoin_client, repositories, conn);

    tokio::select! {
        result = processor.start_processing() => {
            if let Err(e) = result {
                logging::log_error(&format!("Indexer halted: {}", e));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            logging::log_info("Shutting down...");
        }
    }
}
