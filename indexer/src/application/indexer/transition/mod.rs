//! The per-transaction state-transition engine.
//!
//! For every transaction, in strict index order:
//!
//! 1. gather input utxos into the unallocated bag
//! 2. build one pending utxo per output
//! 3. apply the etching, if any
//! 4. apply the mint, if any
//! 5. run the edicts against the bag
//! 6. sweep the residue to the pointer output
//! 7. finalize: events, spend markers, burns, persisted outputs, aggregates
//!
//! Everything runs against the block cache; the only suspension point is the
//! commitment check, which fetches funding transactions over RPC.

mod commitment;
mod edicts;
mod etch;
mod finalize;
mod mint;

use std::collections::BTreeMap;

use bitcoincore_rpc::bitcoin::{Address as BtcAddress, Network, Transaction};

use crate::domain::constants::{
    GENESIS_BLOCK, GENESIS_DUNE_NAME, GENESIS_DUNE_SYMBOL, GENESIS_MINT_END, OP_RETURN_ADDRESS_ID,
    UNKNOWN_ADDRESS_ID,
};
use crate::domain::dunestone::{Dunestone, Etching, Terms};
use crate::domain::errors::DuneError;
use crate::domain::lot;
use crate::domain::models::Utxo;
use crate::infrastructure::bitcoin::BitcoinProvider;
use crate::infrastructure::persistence::{BlockCache, Lookup};

/// One output under construction; persisted only if it ends up holding dunes
#[derive(Debug)]
pub(crate) struct PendingUtxo {
    pub vout_index: u32,
    pub address_id: i64,
    pub address: Option<String>,
    pub value_sats: u64,
    pub is_op_return: bool,
    pub dune_balances: BTreeMap<i64, u128>,
}

/// Working state of a single transaction as it moves through the steps
#[derive(Debug)]
pub(crate) struct TxContext {
    pub tx_index: u32,
    pub transaction_id: i64,
    pub sender_address_id: i64,
    pub cenotaph: bool,
    /// The unallocated bag: dune id -> undistributed amount
    pub unallocated: BTreeMap<i64, u128>,
    pub input_utxos: Vec<Utxo>,
    pub pending: Vec<PendingUtxo>,
    /// Outbound allocations: destination address -> dune -> amount
    pub transfers: BTreeMap<i64, BTreeMap<i64, u128>>,
    /// Burned amounts: dune -> amount
    pub burned: BTreeMap<i64, u128>,
    /// Dune etched by this transaction, target of `0:0` edicts
    pub etched_dune_id: Option<i64>,
}

/// Applies dunestones to the block cache, one transaction at a time
pub struct TransitionEngine<'a> {
    cache: &'a mut BlockCache,
    provider: &'a dyn BitcoinProvider,
    height: u32,
    network: Network,
}

impl<'a> TransitionEngine<'a> {
    pub fn new(
        cache: &'a mut BlockCache,
        provider: &'a dyn BitcoinProvider,
        height: u32,
        network: Network,
    ) -> Self {
        Self {
            cache,
            provider,
            height,
            network,
        }
    }

    /// Run one transaction through the full transition. Returns an error
    /// only on conditions that must abort the whole block.
    pub async fn apply_transaction(
        &mut self,
        tx: &Transaction,
        tx_index: u32,
        stone: &Dunestone,
    ) -> Result<(), DuneError> {
        let is_genesis_coinbase = self.height == GENESIS_BLOCK && tx_index == 0;

        // Step A: resolve inputs and build the unallocated bag
        let input_utxos = self.gather_inputs(tx);

        if input_utxos.is_empty() && !stone.has_actions() && !is_genesis_coinbase {
            // Nothing to spend, nothing declared: no state change
            return Ok(());
        }

        let mut unallocated: BTreeMap<i64, u128> = BTreeMap::new();
        for utxo in &input_utxos {
            for carried in self.cache.utxo_balances(utxo.id) {
                let entry = unallocated.entry(carried.dune_id).or_default();
                *entry = lot::checked_add(*entry, carried.balance, "unallocated bag")?;
            }
        }

        let sender_address_id = if tx.is_coinbase() {
            UNKNOWN_ADDRESS_ID
        } else {
            input_utxos
                .first()
                .map(|utxo| utxo.address_id)
                .unwrap_or(UNKNOWN_ADDRESS_ID)
        };

        let transaction_id = self.cache.ensure_transaction(&tx.txid().to_string());

        let mut ctx = TxContext {
            tx_index,
            transaction_id,
            sender_address_id,
            cenotaph: stone.cenotaph,
            unallocated,
            input_utxos,
            pending: Vec::new(),
            transfers: BTreeMap::new(),
            burned: BTreeMap::new(),
            etched_dune_id: None,
        };

        // Step B: one pending utxo per output
        self.build_pending(&mut ctx, tx);

        // Step C: etching (the genesis coinbase gets the synthetic one)
        if is_genesis_coinbase {
            let genesis = genesis_etching();
            ctx.etched_dune_id = etch::apply_etching(
                self.cache,
                self.provider,
                self.height,
                &mut ctx,
                tx,
                &genesis,
                true,
            )
            .await?;
        } else if let Some(etching) = &stone.etching {
            ctx.etched_dune_id = etch::apply_etching(
                self.cache,
                self.provider,
                self.height,
                &mut ctx,
                tx,
                etching,
                false,
            )
            .await?;
        }

        // Step D: mint
        if let Some(mint_id) = &stone.mint {
            mint::apply_mint(self.cache, self.height, &mut ctx, *mint_id)?;
        }

        // Step E: edicts, or burn-all under a cenotaph
        edicts::apply_edicts(self.cache, &mut ctx, &stone.edicts)?;

        // Step F: residue to the pointer output
        edicts::sweep_pointer(&mut ctx, stone.pointer)?;

        // Step G
        finalize::finalize(self.cache, self.height, &mut ctx)
    }

    /// Resolve every input to a prefetched, unspent utxo
    fn gather_inputs(&self, tx: &Transaction) -> Vec<Utxo> {
        let mut input_utxos = Vec::new();
        for input in &tx.input {
            if input.previous_output.is_null() {
                continue;
            }
            let hash = input.previous_output.txid.to_string();
            let Lookup::Found(transaction_id) = self.cache.transaction_id_by_hash(&hash) else {
                continue;
            };
            let Lookup::Found(utxo) = self
                .cache
                .utxo_by_location(transaction_id, input.previous_output.vout as i32)
            else {
                continue;
            };
            // A spent utxo contributes nothing and can never be re-spent
            if utxo.is_spent() {
                continue;
            }
            input_utxos.push(utxo.clone());
        }
        input_utxos
    }

    fn build_pending(&mut self, ctx: &mut TxContext, tx: &Transaction) {
        for (vout_index, output) in tx.output.iter().enumerate() {
            let is_op_return = output.script_pubkey.is_op_return();
            let (address_id, address) = if is_op_return {
                (OP_RETURN_ADDRESS_ID, None)
            } else {
                match BtcAddress::from_script(&output.script_pubkey, self.network) {
                    Ok(address) => {
                        let string = address.to_string();
                        (self.cache.address_id(&string), Some(string))
                    }
                    Err(_) => (UNKNOWN_ADDRESS_ID, None),
                }
            };
            ctx.pending.push(PendingUtxo {
                vout_index: vout_index as u32,
                address_id,
                address,
                value_sats: output.value.to_sat(),
                is_op_return,
                dune_balances: BTreeMap::new(),
            });
        }
    }
}

/// The protocol-defined etching synthesized at the genesis coinbase
fn genesis_etching() -> Etching {
    Etching {
        divisibility: 0,
        premine: 0,
        dune: Some(GENESIS_DUNE_NAME.to_string()),
        symbol: Some(GENESIS_DUNE_SYMBOL),
        terms: Some(Terms {
            amount: Some(1),
            cap: Some(u128::MAX),
            height: (Some(GENESIS_BLOCK), Some(GENESIS_MINT_END)),
            offset: (None, None),
            price: None,
        }),
        turbo: true,
    }
}
