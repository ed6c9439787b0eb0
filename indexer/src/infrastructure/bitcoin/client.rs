use async_trait::async_trait;
use bitcoincore_rpc::bitcoin::{Block, BlockHash, Network, Txid};
use bitcoincore_rpc::{Auth, Client, RpcApi};
use std::sync::Arc;

use crate::config::BitcoinConfig;
use crate::infrastructure::bitcoin::error::BitcoinClientError;
use crate::infrastructure::bitcoin::provider::{BitcoinProvider, PrevoutInfo};
use crate::utils::logging;

/// Provides async access to the Bitcoin Core RPC API. The underlying client
/// is blocking, so every call hops onto the blocking thread pool.
#[derive(Debug, Clone)]
pub struct BitcoinClient {
    client: Arc<Client>,
    network: Network,
}

impl BitcoinClient {
    /// Creates a new Bitcoin client from configuration
    pub fn new(bitcoin_config: &BitcoinConfig) -> Result<Self, BitcoinClientError> {
        let rpc_url = format!("http://{}:{}", bitcoin_config.host, bitcoin_config.port);
        let auth = Auth::UserPass(
            bitcoin_config.username.clone(),
            bitcoin_config.password.clone(),
        );

        let network = parse_network(&bitcoin_config.network)?;

        match Client::new(&rpc_url, auth) {
            Ok(client) => {
                logging::log_info(&format!(
                    "Connected to Bitcoin RPC at {} ({})",
                    rpc_url, bitcoin_config.network
                ));
                Ok(BitcoinClient {
                    client: Arc::new(client),
                    network,
                })
            }
            Err(e) => Err(BitcoinClientError::ConnectionError(format!(
                "Failed to connect to Bitcoin RPC at {}: {}",
                rpc_url, e
            ))),
        }
    }

    /// Network the client is configured for
    pub fn network(&self) -> Network {
        self.network
    }
}

fn parse_network(name: &str) -> Result<Network, BitcoinClientError> {
    match name {
        "mainnet" | "bitcoin" => Ok(Network::Bitcoin),
        "testnet" | "testnet4" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => Err(BitcoinClientError::ConfigError(format!(
            "Unknown network '{}'",
            other
        ))),
    }
}

#[async_trait]
impl BitcoinProvider for BitcoinClient {
    async fn get_block_count(&self) -> Result<u64, BitcoinClientError> {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || {
            client.get_block_count().map_err(BitcoinClientError::RpcError)
        })
        .await
        .map_err(|e| BitcoinClientError::NetworkError(e.to_string()))?
    }

    async fn get_block_hash(&self, height: u64) -> Result<BlockHash, BitcoinClientError> {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || {
            client
                .get_block_hash(height)
                .map_err(BitcoinClientError::RpcError)
        })
        .await
        .map_err(|e| BitcoinClientError::NetworkError(e.to_string()))?
    }

    async fn get_block(&self, block_hash: &BlockHash) -> Result<Block, BitcoinClientError> {
        let client = self.client.clone();
        let block_hash = *block_hash;
        tokio::task::spawn_blocking(move || {
            client
                .get_block(&block_hash)
                .map_err(BitcoinClientError::RpcError)
        })
        .await
        .map_err(|e| BitcoinClientError::NetworkError(e.to_string()))?
    }

    async fn get_prevout_info(
        &self,
        txid: &Txid,
        vout: u32,
    ) -> Result<Option<PrevoutInfo>, BitcoinClientError> {
        let client = self.client.clone();
        let txid = *txid;
        tokio::task::spawn_blocking(move || {
            let info = client
                .get_raw_transaction_info(&txid, None)
                .map_err(BitcoinClientError::RpcError)?;

            let Some(output) = info.vout.get(vout as usize) else {
                return Ok(None);
            };
            let script_pubkey_type = output.script_pub_key.type_.clone().and_then(|t| {
                serde_json::to_value(t)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
            });

            let block_height = match info.blockhash {
                Some(hash) => {
                    let header = client
                        .get_block_header_info(&hash)
                        .map_err(BitcoinClientError::RpcError)?;
                    Some(header.height as u32)
                }
                None => None,
            };

            Ok(Some(PrevoutInfo {
                script_pubkey_type,
                block_height,
            }))
        })
        .await
        .map_err(|e| BitcoinClientError::NetworkError(e.to_string()))?
    }
}
