//! Read-ahead block fetching.
//!
//! Keeps a bounded window of upcoming blocks in memory, refilled with a
//! chunk of concurrent RPC fetches, and hands blocks out strictly by height.

use std::collections::HashMap;
use std::sync::Arc;

use bitcoincore_rpc::bitcoin::Block;
use futures::future::try_join_all;

use crate::infrastructure::bitcoin::{BitcoinClientError, BitcoinProvider};

pub struct BlockReader {
    provider: Arc<dyn BitcoinProvider>,
    window: HashMap<u64, Block>,
    next_fetch: u64,
    max_cache_size: usize,
    chunk_size: usize,
}

impl BlockReader {
    pub fn new(
        provider: Arc<dyn BitcoinProvider>,
        start_height: u64,
        max_cache_size: usize,
        chunk_size: usize,
    ) -> Self {
        Self {
            provider,
            window: HashMap::new(),
            next_fetch: start_height,
            max_cache_size: max_cache_size.max(1),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Fetch the block at `height`, refilling the window as needed. The
    /// caller must only request heights at or below the chain tip.
    pub async fn get_block(&mut self, height: u64) -> Result<Block, BitcoinClientError> {
        // A request behind the window start means the previous attempt at
        // this height was aborted; rewind and refetch
        if height < self.next_fetch && !self.window.contains_key(&height) {
            self.window.clear();
            self.next_fetch = height;
        }

        loop {
            if let Some(block) = self.window.remove(&height) {
                return Ok(block);
            }

            let tip = self.provider.get_block_count().await?;
            if height > tip {
                return Err(BitcoinClientError::Other(format!(
                    "block {} is beyond the chain tip {}",
                    height, tip
                )));
            }
            self.refill(tip).await?;
        }
    }

    /// Top the window up with chunks of concurrent fetches
    async fn refill(&mut self, tip: u64) -> Result<(), BitcoinClientError> {
        while self.window.len() < self.max_cache_size && self.next_fetch <= tip {
            let room = self.max_cache_size - self.window.len();
            let available = (tip - self.next_fetch + 1) as usize;
            let count = self.chunk_size.min(room).min(available);

            let mut fetches = Vec::with_capacity(count);
            for height in self.next_fetch..self.next_fetch + count as u64 {
                let provider = self.provider.clone();
                fetches.push(async move {
                    let hash = provider.get_block_hash(height).await?;
                    let block = provider.get_block(&hash).await?;
                    Ok::<(u64, Block), BitcoinClientError>((height, block))
                });
            }

            let fetched = try_join_all(fetches).await?;
            for (height, block) in fetched {
                self.window.insert(height, block);
            }
            self.next_fetch += count as u64;
        }
        Ok(())
    }
}
