//! Block processor: drives the per-block pipeline in strict height order.
//!
//! prefetch into the block cache -> run every transaction through the
//! transition engine -> flush the cache in one store transaction. A failed
//! block discards its cache and is retried from scratch.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::domain::constants::COMMIT_CONFIRMATIONS;
use crate::domain::dunestone::Dunestone;
use crate::domain::errors::BlockProcessorError;
use crate::infrastructure::bitcoin::{BitcoinClient, BitcoinProvider};
use crate::infrastructure::persistence::{BlockCache, NextIds, Repositories};
use crate::utils::logging;

use super::block_reader::BlockReader;
use super::retry::RetryHandler;
use super::transition::TransitionEngine;

pub struct BlockProcessor {
    bitcoin_client: BitcoinClient,
    repositories: Repositories,
    conn: DatabaseConnection,
    config: AppConfig,
    next_ids: NextIds,
}

impl BlockProcessor {
    pub fn new(
        config: AppConfig,
        bitcoin_client: BitcoinClient,
        repositories: Repositories,
        conn: DatabaseConnection,
    ) -> Self {
        Self {
            bitcoin_client,
            repositories,
            conn,
            config,
            next_ids: NextIds::default(),
        }
    }

    /// Run forever: resume from the bookmark, then follow the chain tip
    pub async fn start_processing(&mut self) -> Result<(), BlockProcessorError> {
        let network = &self.config.bitcoin.network;

        let mut height = match self
            .repositories
            .bookmark
            .get_last_processed_block(network)
            .await?
        {
            Some(last) => {
                logging::log_info(&format!("Resuming from block {}", last + 1));
                last + 1
            }
            None => {
                logging::log_info(&format!(
                    "Empty store, starting from block {}",
                    self.config.indexer.start_block_height
                ));
                self.config.indexer.start_block_height
            }
        };

        self.next_ids = NextIds::load(&self.repositories).await?;

        let mut reader = BlockReader::new(
            Arc::new(self.bitcoin_client.clone()),
            u64::from(height),
            self.config.indexer.max_block_cache_size,
            self.config.indexer.get_block_chunk_size,
        );
        let retry = RetryHandler::new(self.config.indexer.max_retries);

        loop {
            let tip = retry
                .execute_with_retry(|| self.bitcoin_client.get_block_count(), "get_block_count")
                .await?;

            while u64::from(height) <= tip {
                let mut attempt = 0;
                loop {
                    match self.process_block(&mut reader, height, tip).await {
                        Ok(()) => break,
                        Err(e) => {
                            attempt += 1;
                            if attempt >= self.config.indexer.max_retries {
                                // Operator review required; the store holds
                                // nothing from the failed block
                                logging::log_error(&format!(
                                    "Block {} failed {} times, halting: {}",
                                    height, attempt, e
                                ));
                                return Err(e);
                            }
                            logging::log_warning(&format!(
                                "Block {} failed (attempt {}): {}, retrying",
                                height, attempt, e
                            ));
                            tokio::time::sleep(Duration::from_millis(1_000)).await;
                        }
                    }
                }
                height += 1;
            }

            logging::log_debug(&format!("At tip {}, waiting for new blocks", tip));
            tokio::time::sleep(Duration::from_millis(
                self.config.indexer.process_interval_ms,
            ))
            .await;
        }
    }

    /// Process one block end to end; any error leaves the store untouched
    async fn process_block(
        &mut self,
        reader: &mut BlockReader,
        height: u32,
        tip: u64,
    ) -> Result<(), BlockProcessorError> {
        let block = reader.get_block(u64::from(height)).await?;
        let block_hash = block.block_hash().to_string();
        let network = self.bitcoin_client.network();

        // Decode every dunestone up front; the decode also feeds the
        // prefetch with the dunes the block references
        let dunestones: Vec<Dunestone> = block
            .txdata
            .iter()
            .map(Dunestone::from_transaction)
            .collect();

        let mut cache = BlockCache::prefetch(
            &self.repositories,
            &block,
            &dunestones,
            height,
            network,
            self.next_ids.clone(),
        )
        .await?;

        let mut engine =
            TransitionEngine::new(&mut cache, &self.bitcoin_client, height, network);
        for (tx_index, (tx, stone)) in block.txdata.iter().zip(&dunestones).enumerate() {
            engine.apply_transaction(tx, tx_index as u32, stone).await?;
        }

        let confirmed = tip.saturating_sub(u64::from(height)) + 1 >= u64::from(COMMIT_CONFIRMATIONS);
        let event_count = cache.event_count();
        let (flush, next_ids) =
            cache.into_flush(&self.config.bitcoin.network, &block_hash, confirmed);

        self.repositories.flush_block(&self.conn, &flush).await?;
        // Ids advance only once the block is durably committed
        self.next_ids = next_ids;

        let _ = self
            .repositories
            .block_status
            .mark_processed(
                height,
                &block_hash,
                block.txdata.len() as i32,
                event_count as i32,
                confirmed,
            )
            .await;

        logging::log_info(&format!(
            "Block {}: {} txs, {} events ({} behind tip)",
            height,
            block.txdata.len(),
            event_count,
            tip.saturating_sub(u64::from(height)),
        ));

        Ok(())
    }
}
