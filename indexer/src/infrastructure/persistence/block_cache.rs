//! Per-block in-memory staging over the persistent store.
//!
//! One `BlockCache` is built per block: a handful of bulk prefetches pull
//! every row the transition engine could touch, the engine then runs entirely
//! against RAM, and a single transactional flush writes the block out. On any
//! failure the cache is dropped and the store never sees partial state.
//!
//! The cache is the exclusive owner of its rows while the block is being
//! processed; nothing else reads or writes them.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use bitcoincore_rpc::bitcoin::{Address as BtcAddress, Block, Network};

use crate::domain::constants::RESERVED_ADDRESS_STRINGS;
use crate::domain::dunestone::Dunestone;
use crate::domain::models::{
    Address, Balance, Dune, Event, EventType, TransactionRow, Utxo, UtxoBalance,
};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::Repositories;

/// Result of a cache lookup after prefetch: the row is either in RAM or it
/// definitively does not exist. There is no "maybe in the store" state.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }
}

/// Id allocator state, carried across blocks and snapshotted per block so an
/// aborted block leaves no gaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextIds {
    pub address: i64,
    pub transaction: i64,
    pub utxo: i64,
    pub dune: i64,
    pub balance: i64,
    pub event: i64,
}

impl NextIds {
    /// Seed the allocator from the highest persisted ids
    pub async fn load(repositories: &Repositories) -> Result<NextIds, DbError> {
        Ok(NextIds {
            // The reserved sentinel rows occupy ids 1..=3 even when unseeded
            address: repositories.address.max_id().await?.max(3),
            transaction: repositories.transaction.max_id().await?,
            utxo: repositories.utxo.max_id().await?,
            dune: repositories.dune.max_id().await?,
            balance: repositories.balance.max_id().await?,
            event: repositories.event.max_id().await?,
        })
    }
}

/// Everything a finished block writes, in flush order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BlockFlush {
    pub network: String,
    pub block_hash: String,
    pub height: u32,
    pub confirmed: bool,
    pub addresses: Vec<Address>,
    pub dunes: Vec<Dune>,
    pub transactions: Vec<TransactionRow>,
    pub utxos: Vec<Utxo>,
    pub utxo_balances: Vec<UtxoBalance>,
    pub balances: Vec<Balance>,
    pub events: Vec<Event>,
}

/// Block-scoped staging of all entities keyed by their natural indexes
#[derive(Debug, Default)]
pub struct BlockCache {
    height: u32,
    next_ids: NextIds,

    addresses: HashMap<i64, Address>,
    address_ids_by_string: HashMap<String, i64>,
    new_addresses: BTreeSet<i64>,

    transactions: HashMap<i64, TransactionRow>,
    transaction_ids_by_hash: HashMap<String, i64>,
    new_transactions: BTreeSet<i64>,

    utxos: HashMap<i64, Utxo>,
    utxo_ids_by_location: HashMap<(i64, i32), i64>,
    dirty_utxos: BTreeSet<i64>,

    utxo_balances: HashMap<i64, Vec<UtxoBalance>>,
    new_utxo_balances: Vec<UtxoBalance>,

    dunes: HashMap<i64, Dune>,
    dune_ids_by_protocol: HashMap<String, i64>,
    dune_ids_by_name: HashMap<String, i64>,
    dirty_dunes: BTreeSet<i64>,

    balances: HashMap<(i64, i64), Balance>,
    dirty_balances: BTreeSet<(i64, i64)>,

    events: Vec<Event>,
}

impl BlockCache {
    /// An empty cache for one block. The reserved sentinel address rows are
    /// always present; the store carries them from the first migration.
    pub fn new(height: u32, next_ids: NextIds) -> BlockCache {
        let mut cache = BlockCache {
            height,
            next_ids,
            ..BlockCache::default()
        };
        for (id, string) in RESERVED_ADDRESS_STRINGS {
            cache.index_address(Address {
                id,
                address: string.to_string(),
            });
        }
        cache
    }

    /// Build the cache for one block: bulk prefetch of transactions, utxos,
    /// their balances, addresses, dunes, and address aggregates, in
    /// foreign-key dependency order.
    pub async fn prefetch(
        repositories: &Repositories,
        block: &Block,
        dunestones: &[Dunestone],
        height: u32,
        network: Network,
        next_ids: NextIds,
    ) -> Result<BlockCache, DbError> {
        let mut cache = BlockCache::new(height, next_ids);

        // 1. Transactions referenced by any input
        let mut input_tx_hashes: HashSet<String> = HashSet::new();
        for tx in &block.txdata {
            for input in &tx.input {
                if !input.previous_output.is_null() {
                    input_tx_hashes.insert(input.previous_output.txid.to_string());
                }
            }
        }
        let hashes: Vec<String> = input_tx_hashes.into_iter().collect();
        for row in repositories.transaction.load_by_hashes(&hashes).await? {
            cache
                .transaction_ids_by_hash
                .insert(row.hash.clone(), row.id);
            cache.transactions.insert(row.id, row);
        }

        // 2. Utxos at the referenced (transaction, vout) locations
        let mut locations: Vec<(i64, i32)> = Vec::new();
        for tx in &block.txdata {
            for input in &tx.input {
                if input.previous_output.is_null() {
                    continue;
                }
                let hash = input.previous_output.txid.to_string();
                if let Some(transaction_id) = cache.transaction_ids_by_hash.get(&hash) {
                    locations.push((*transaction_id, input.previous_output.vout as i32));
                }
            }
        }
        for utxo in repositories.utxo.load_by_locations(&locations).await? {
            cache
                .utxo_ids_by_location
                .insert((utxo.transaction_id, utxo.vout_index), utxo.id);
            cache.utxos.insert(utxo.id, utxo);
        }

        // 3. Dune balances sitting on those utxos
        let utxo_ids: Vec<i64> = cache.utxos.keys().copied().collect();
        for balance in repositories
            .utxo_balance
            .load_by_utxo_ids(&utxo_ids)
            .await?
        {
            cache
                .utxo_balances
                .entry(balance.utxo_id)
                .or_default()
                .push(balance);
        }

        // 4. Addresses: reserved sentinels, input-utxo holders, and every
        //    vout recipient in the block
        let mut address_ids: HashSet<i64> =
            RESERVED_ADDRESS_STRINGS.iter().map(|(id, _)| *id).collect();
        for utxo in cache.utxos.values() {
            address_ids.insert(utxo.address_id);
        }
        let ids: Vec<i64> = address_ids.iter().copied().collect();
        for address in repositories.address.load_by_ids(&ids).await? {
            cache.index_address(address);
        }

        let mut recipient_strings: HashSet<String> = HashSet::new();
        for tx in &block.txdata {
            for output in &tx.output {
                if let Ok(address) = BtcAddress::from_script(&output.script_pubkey, network) {
                    recipient_strings.insert(address.to_string());
                }
            }
        }
        let strings: Vec<String> = recipient_strings.into_iter().collect();
        for address in repositories.address.load_by_strings(&strings).await? {
            address_ids.insert(address.id);
            cache.index_address(address);
        }

        // 5. Dunes referenced by mints, edicts, carried balances, and
        //    etching-name collisions
        let mut protocol_ids: HashSet<String> = HashSet::new();
        let mut names: HashSet<String> = HashSet::new();
        for stone in dunestones {
            if let Some(mint) = &stone.mint {
                protocol_ids.insert(mint.to_string());
            }
            for edict in &stone.edicts {
                if !edict.id.is_self_reference() {
                    protocol_ids.insert(edict.id.to_string());
                }
            }
            if let Some(etching) = &stone.etching {
                if let Some(name) = &etching.dune {
                    names.insert(name.to_uppercase());
                }
            }
        }
        let mut dune_ids: HashSet<i64> = HashSet::new();
        for balances in cache.utxo_balances.values() {
            for balance in balances {
                dune_ids.insert(balance.dune_id);
            }
        }

        let keys: Vec<String> = protocol_ids.into_iter().collect();
        for dune in repositories.dune.load_by_protocol_ids(&keys).await? {
            dune_ids.remove(&dune.id);
            cache.index_dune(dune);
        }
        let keys: Vec<String> = names.into_iter().collect();
        for dune in repositories.dune.load_by_names(&keys).await? {
            dune_ids.remove(&dune.id);
            cache.index_dune(dune);
        }
        let keys: Vec<i64> = dune_ids.into_iter().collect();
        for dune in repositories.dune.load_by_ids(&keys).await? {
            cache.index_dune(dune);
        }

        // 6. Address aggregates for every prefetched address
        let all_address_ids: Vec<i64> = cache.addresses.keys().copied().collect();
        for balance in repositories
            .balance
            .load_by_address_ids(&all_address_ids)
            .await?
        {
            cache
                .balances
                .insert((balance.address_id, balance.dune_id), balance);
        }

        Ok(cache)
    }

    /// Block height this cache stages
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index_address(&mut self, address: Address) {
        self.address_ids_by_string
            .insert(address.address.clone(), address.id);
        self.addresses.insert(address.id, address);
    }

    fn index_dune(&mut self, dune: Dune) {
        self.dune_ids_by_protocol
            .insert(dune.dune_protocol_id.clone(), dune.id);
        self.dune_ids_by_name.insert(dune.name.clone(), dune.id);
        self.dunes.insert(dune.id, dune);
    }

    // ───── addresses ─────

    /// Find or create the row for an address string
    pub fn address_id(&mut self, address: &str) -> i64 {
        if let Some(id) = self.address_ids_by_string.get(address) {
            return *id;
        }
        self.next_ids.address += 1;
        let id = self.next_ids.address;
        self.index_address(Address {
            id,
            address: address.to_string(),
        });
        self.new_addresses.insert(id);
        id
    }

    /// Address string for a row id, if prefetched or created this block
    pub fn address_string(&self, id: i64) -> Option<&str> {
        self.addresses.get(&id).map(|a| a.address.as_str())
    }

    // ───── transactions ─────

    /// Transaction row id by hash
    pub fn transaction_id_by_hash(&self, hash: &str) -> Lookup<i64> {
        match self.transaction_ids_by_hash.get(hash) {
            Some(id) => Lookup::Found(*id),
            None => Lookup::Absent,
        }
    }

    /// Find or create the row for a transaction hash
    pub fn ensure_transaction(&mut self, hash: &str) -> i64 {
        if let Some(id) = self.transaction_ids_by_hash.get(hash) {
            return *id;
        }
        self.next_ids.transaction += 1;
        let id = self.next_ids.transaction;
        self.transaction_ids_by_hash.insert(hash.to_string(), id);
        self.transactions.insert(
            id,
            TransactionRow {
                id,
                hash: hash.to_string(),
            },
        );
        self.new_transactions.insert(id);
        id
    }

    // ───── utxos ─────

    /// Utxo by natural key
    pub fn utxo_by_location(&self, transaction_id: i64, vout_index: i32) -> Lookup<&Utxo> {
        match self.utxo_ids_by_location.get(&(transaction_id, vout_index)) {
            Some(id) => Lookup::Found(&self.utxos[id]),
            None => Lookup::Absent,
        }
    }

    /// Dune balances carried by a utxo
    pub fn utxo_balances(&self, utxo_id: i64) -> &[UtxoBalance] {
        self.utxo_balances
            .get(&utxo_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Mark a utxo spent; it contributes nothing from here on
    pub fn mark_utxo_spent(&mut self, utxo_id: i64, block: u32, spending_transaction_id: i64) {
        if let Some(utxo) = self.utxos.get_mut(&utxo_id) {
            utxo.block_spent = Some(block);
            utxo.transaction_spent_id = Some(spending_transaction_id);
            self.dirty_utxos.insert(utxo_id);
        }
    }

    /// Create a utxo row together with its non-zero balance rows
    pub fn create_utxo(
        &mut self,
        transaction_id: i64,
        vout_index: i32,
        address_id: i64,
        value_sats: u64,
        dune_balances: &BTreeMap<i64, u128>,
    ) -> i64 {
        self.next_ids.utxo += 1;
        let id = self.next_ids.utxo;
        let utxo = Utxo {
            id,
            transaction_id,
            vout_index,
            address_id,
            value_sats,
            block_created: self.height,
            block_spent: None,
            transaction_spent_id: None,
        };
        self.utxo_ids_by_location
            .insert((transaction_id, vout_index), id);
        self.utxos.insert(id, utxo);
        self.dirty_utxos.insert(id);

        for (dune_id, balance) in dune_balances {
            if *balance == 0 {
                continue;
            }
            let row = UtxoBalance {
                utxo_id: id,
                dune_id: *dune_id,
                balance: *balance,
            };
            self.utxo_balances.entry(id).or_default().push(row.clone());
            self.new_utxo_balances.push(row);
        }

        id
    }

    // ───── dunes ─────

    /// Dune row id by protocol id (`block:tx`)
    pub fn dune_id_by_protocol(&self, protocol_id: &str) -> Lookup<i64> {
        match self.dune_ids_by_protocol.get(protocol_id) {
            Some(id) => Lookup::Found(*id),
            None => Lookup::Absent,
        }
    }

    /// Whether a dune with this (uppercased) name exists
    pub fn dune_name_taken(&self, name: &str) -> bool {
        self.dune_ids_by_name.contains_key(name)
    }

    /// Dune by row id
    pub fn dune(&self, id: i64) -> Option<&Dune> {
        self.dunes.get(&id)
    }

    /// Mutable dune access; the row is flagged for flush
    pub fn dune_mut(&mut self, id: i64) -> Option<&mut Dune> {
        if self.dunes.contains_key(&id) {
            self.dirty_dunes.insert(id);
        }
        self.dunes.get_mut(&id)
    }

    /// Create a dune row; the caller supplies every attribute but the id
    pub fn create_dune(&mut self, mut dune: Dune) -> i64 {
        self.next_ids.dune += 1;
        dune.id = self.next_ids.dune;
        let id = dune.id;
        self.dirty_dunes.insert(id);
        self.index_dune(dune);
        id
    }

    // ───── address aggregates ─────

    /// Current aggregate balance of (address, dune); zero when absent
    pub fn balance(&self, address_id: i64, dune_id: i64) -> u128 {
        self.balances
            .get(&(address_id, dune_id))
            .map(|b| b.balance)
            .unwrap_or(0)
    }

    /// Set the aggregate balance of (address, dune), creating the row on
    /// first touch. Rows persist even at zero.
    pub fn set_balance(&mut self, address_id: i64, dune_id: i64, balance: u128) {
        let key = (address_id, dune_id);
        if let Some(row) = self.balances.get_mut(&key) {
            row.balance = balance;
        } else {
            self.next_ids.balance += 1;
            self.balances.insert(
                key,
                Balance {
                    id: self.next_ids.balance,
                    address_id,
                    dune_id,
                    balance,
                },
            );
        }
        self.dirty_balances.insert(key);
    }

    // ───── events ─────

    /// Append an audit-log event; ids are assigned in emission order
    #[allow(clippy::too_many_arguments)]
    pub fn push_event(
        &mut self,
        event_type: EventType,
        transaction_id: i64,
        dune_id: i64,
        amount: u128,
        from_address_id: i64,
        to_address_id: i64,
    ) {
        self.next_ids.event += 1;
        self.events.push(Event {
            id: self.next_ids.event,
            event_type,
            block: self.height,
            transaction_id,
            dune_id,
            amount,
            from_address_id,
            to_address_id,
        });
    }

    /// Number of events staged so far
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Events staged so far, in emission order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    // ───── flush ─────

    /// Turn the staged state into its bulk writes, in flush order, together
    /// with the advanced id allocator
    pub fn into_flush(
        self,
        network: &str,
        block_hash: &str,
        confirmed: bool,
    ) -> (BlockFlush, NextIds) {
        let flush = BlockFlush {
            network: network.to_string(),
            block_hash: block_hash.to_string(),
            height: self.height,
            confirmed,
            addresses: self
                .new_addresses
                .iter()
                .map(|id| self.addresses[id].clone())
                .collect(),
            dunes: self
                .dirty_dunes
                .iter()
                .map(|id| self.dunes[id].clone())
                .collect(),
            transactions: self
                .new_transactions
                .iter()
                .map(|id| self.transactions[id].clone())
                .collect(),
            utxos: self
                .dirty_utxos
                .iter()
                .map(|id| self.utxos[id].clone())
                .collect(),
            utxo_balances: self.new_utxo_balances.clone(),
            balances: self
                .dirty_balances
                .iter()
                .map(|key| self.balances[key].clone())
                .collect(),
            events: self.events.clone(),
        };
        (flush, self.next_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cache(height: u32) -> BlockCache {
        BlockCache::new(
            height,
            NextIds {
                address: 3,
                ..NextIds::default()
            },
        )
    }

    #[test]
    fn address_find_or_create_is_idempotent() {
        let mut cache = empty_cache(840_000);
        let a = cache.address_id("bc1qalpha");
        let b = cache.address_id("bc1qalpha");
        let c = cache.address_id("bc1qbeta");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, 4);
        assert_eq!(c, 5);
        assert_eq!(cache.address_string(a), Some("bc1qalpha"));
    }

    #[test]
    fn lookups_distinguish_found_from_absent() {
        let mut cache = empty_cache(840_000);
        assert_eq!(cache.transaction_id_by_hash("deadbeef"), Lookup::Absent);
        let id = cache.ensure_transaction("deadbeef");
        assert_eq!(cache.transaction_id_by_hash("deadbeef"), Lookup::Found(id));
        assert_eq!(cache.utxo_by_location(id, 0), Lookup::Absent);
    }

    #[test]
    fn created_utxos_are_reachable_by_location_and_skip_zero_balances() {
        let mut cache = empty_cache(840_001);
        let tx = cache.ensure_transaction("cafe");
        let addr = cache.address_id("bc1qholder");
        let mut balances = BTreeMap::new();
        balances.insert(7, 100u128);
        balances.insert(8, 0u128);
        let utxo_id = cache.create_utxo(tx, 1, addr, 5_000, &balances);

        let utxo = cache.utxo_by_location(tx, 1).found().unwrap();
        assert_eq!(utxo.id, utxo_id);
        assert_eq!(utxo.block_created, 840_001);
        let rows = cache.utxo_balances(utxo_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dune_id, 7);
        assert_eq!(rows[0].balance, 100);
    }

    #[test]
    fn balance_rows_survive_zero() {
        let mut cache = empty_cache(840_001);
        cache.set_balance(4, 7, 50);
        assert_eq!(cache.balance(4, 7), 50);
        cache.set_balance(4, 7, 0);
        assert_eq!(cache.balance(4, 7), 0);

        let (flush, _) = cache.into_flush("mainnet", "hash", false);
        assert_eq!(flush.balances.len(), 1);
        assert_eq!(flush.balances[0].balance, 0);
    }

    #[test]
    fn flush_carries_only_dirty_rows_in_id_order() {
        let mut cache = empty_cache(840_002);
        cache.index_address(Address {
            id: 9,
            address: "bc1qold".to_string(),
        });
        let fresh = cache.address_id("bc1qnew");
        let tx = cache.ensure_transaction("feed");
        cache.push_event(EventType::Transfer, tx, 1, 10, 9, fresh);
        cache.push_event(EventType::Burn, tx, 1, 2, 9, 2);

        let (flush, next_ids) = cache.into_flush("mainnet", "hash", true);
        // the prefetched address is not rewritten
        assert_eq!(flush.addresses.len(), 1);
        assert_eq!(flush.addresses[0].address, "bc1qnew");
        assert_eq!(flush.transactions.len(), 1);
        assert_eq!(flush.events.len(), 2);
        assert!(flush.events[0].id < flush.events[1].id);
        assert_eq!(next_ids.event, 2);
        assert_eq!(flush.height, 840_002);
        assert!(flush.confirmed);
    }
}
