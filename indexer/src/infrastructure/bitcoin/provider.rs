use async_trait::async_trait;
use bitcoincore_rpc::bitcoin::{Block, BlockHash, Txid};

use crate::infrastructure::bitcoin::error::BitcoinClientError;

/// What the commitment checker needs to know about a spent output: the type
/// of the script it locks and the height of the block holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrevoutInfo {
    pub script_pubkey_type: Option<String>,
    /// None while the funding transaction is unconfirmed
    pub block_height: Option<u32>,
}

/// Seam over the Bitcoin Core RPC surface the indexer consumes. The engine
/// tests substitute a stub implementation.
#[async_trait]
pub trait BitcoinProvider: Send + Sync + std::fmt::Debug {
    /// Current chain height
    async fn get_block_count(&self) -> Result<u64, BitcoinClientError>;

    /// Block hash at a height
    async fn get_block_hash(&self, height: u64) -> Result<BlockHash, BitcoinClientError>;

    /// Full block, witness data included
    async fn get_block(&self, block_hash: &BlockHash) -> Result<Block, BitcoinClientError>;

    /// Script type and confirmation height of `txid:vout`, or `None` when
    /// the output does not exist
    async fn get_prevout_info(
        &self,
        txid: &Txid,
        vout: u32,
    ) -> Result<Option<PrevoutInfo>, BitcoinClientError>;
}
