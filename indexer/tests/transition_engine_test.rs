//! End-to-end transition-engine scenarios, run against an in-memory block
//! cache and a stub RPC provider. No database or node required.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use bitcoincore_rpc::bitcoin::absolute::LockTime;
use bitcoincore_rpc::bitcoin::hashes::Hash;
use bitcoincore_rpc::bitcoin::script::PushBytesBuf;
use bitcoincore_rpc::bitcoin::transaction::Version;
use bitcoincore_rpc::bitcoin::{
    Address as BtcAddress, Amount, Block, BlockHash, Network, OutPoint, ScriptBuf, Sequence,
    Transaction, TxIn, TxOut, Txid, WPubkeyHash, Witness,
};

use dunes_indexer::application::indexer::TransitionEngine;
use dunes_indexer::domain::dune_name::DuneName;
use dunes_indexer::domain::dunestone::Dunestone;
use dunes_indexer::domain::models::{Dune, EventType};
use dunes_indexer::infrastructure::bitcoin::{BitcoinClientError, BitcoinProvider, PrevoutInfo};
use dunes_indexer::infrastructure::persistence::{BlockCache, Lookup, NextIds};

const ETCH_BLOCK: u32 = 840_100;
const DUNE_NAME: &str = "HELLOWORLDDUNE";

/// Stub RPC: every prevout is a taproot output confirmed at the given height
#[derive(Debug, Default)]
struct StubProvider {
    funding_height: Option<u32>,
}

#[async_trait]
impl BitcoinProvider for StubProvider {
    async fn get_block_count(&self) -> Result<u64, BitcoinClientError> {
        Ok(u64::from(ETCH_BLOCK) + 100)
    }

    async fn get_block_hash(&self, _height: u64) -> Result<BlockHash, BitcoinClientError> {
        Err(BitcoinClientError::Other("not used in tests".to_string()))
    }

    async fn get_block(&self, _hash: &BlockHash) -> Result<Block, BitcoinClientError> {
        Err(BitcoinClientError::Other("not used in tests".to_string()))
    }

    async fn get_prevout_info(
        &self,
        _txid: &Txid,
        _vout: u32,
    ) -> Result<Option<PrevoutInfo>, BitcoinClientError> {
        Ok(self.funding_height.map(|height| PrevoutInfo {
            script_pubkey_type: Some("witness_v1_taproot".to_string()),
            block_height: Some(height),
        }))
    }
}

fn fresh_cache(height: u32) -> BlockCache {
    BlockCache::new(
        height,
        NextIds {
            address: 3,
            ..NextIds::default()
        },
    )
}

fn payment_script(seed: u8) -> ScriptBuf {
    ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array([seed; 20]))
}

fn address_string(seed: u8) -> String {
    BtcAddress::from_script(&payment_script(seed), Network::Bitcoin)
        .unwrap()
        .to_string()
}

fn payment_out(seed: u8, sats: u64) -> TxOut {
    TxOut {
        value: Amount::from_sat(sats),
        script_pubkey: payment_script(seed),
    }
}

fn op_return_out(payload: &str) -> TxOut {
    let data = PushBytesBuf::try_from(payload.as_bytes().to_vec()).unwrap();
    TxOut {
        value: Amount::ZERO,
        script_pubkey: ScriptBuf::new_op_return(&data),
    }
}

fn spend_input(prev_txid: &str, vout: u32) -> TxIn {
    TxIn {
        previous_output: OutPoint {
            txid: Txid::from_str(prev_txid).unwrap(),
            vout,
        },
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

fn coinbase_input() -> TxIn {
    TxIn {
        previous_output: OutPoint::null(),
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

/// Witness stack revealing the taproot commitment to `name`
fn commitment_witness(name: &str) -> Witness {
    let value: DuneName = name.parse().unwrap();
    let push = PushBytesBuf::try_from(value.commitment()).unwrap();
    let mut script = ScriptBuf::new();
    script.push_slice(&push);

    let mut witness = Witness::new();
    witness.push(script.as_bytes());
    witness.push([0xc0]);
    witness
}

fn build_tx(input: Vec<TxIn>, output: Vec<TxOut>) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input,
        output,
    }
}

const PREV_A: &str = "1111111111111111111111111111111111111111111111111111111111111111";
const PREV_B: &str = "2222222222222222222222222222222222222222222222222222222222222222";

/// Place an unspent utxo carrying `balances` of dunes into the cache, with
/// its address aggregates, as a previous block would have left it
fn seed_utxo(
    cache: &mut BlockCache,
    prev_txid: &str,
    vout: i32,
    holder_seed: u8,
    balances: &[(i64, u128)],
) -> i64 {
    let transaction_id = cache.ensure_transaction(prev_txid);
    let address_id = cache.address_id(&address_string(holder_seed));
    let map: BTreeMap<i64, u128> = balances.iter().copied().collect();
    let utxo_id = cache.create_utxo(transaction_id, vout, address_id, 10_000, &map);
    for (dune_id, amount) in balances {
        let current = cache.balance(address_id, *dune_id);
        cache.set_balance(address_id, *dune_id, current + amount);
    }
    utxo_id
}

fn seed_dune(cache: &mut BlockCache, protocol_id: &str, name: &str, dune: Dune) -> i64 {
    cache.create_dune(Dune {
        dune_protocol_id: protocol_id.to_string(),
        name: name.to_string(),
        ..dune
    })
}

fn default_dune() -> Dune {
    Dune {
        id: 0,
        dune_protocol_id: String::new(),
        name: String::new(),
        symbol: None,
        decimals: 0,
        premine: 0,
        mints: 0,
        mint_cap: Some(100),
        mint_amount: Some(10),
        mint_start: None,
        mint_end: None,
        mint_offset_start: None,
        mint_offset_end: None,
        price_amount: None,
        price_pay_to: None,
        turbo: true,
        unmintable: false,
        burnt_amount: 0,
        etch_transaction_id: 0,
        deployer_address_id: 3,
    }
}

async fn apply(
    cache: &mut BlockCache,
    provider: &StubProvider,
    height: u32,
    tx: &Transaction,
    tx_index: u32,
) {
    let stone = Dunestone::from_transaction(tx);
    let mut engine = TransitionEngine::new(cache, provider, height, Network::Bitcoin);
    engine
        .apply_transaction(tx, tx_index, &stone)
        .await
        .unwrap();
}

fn etch_payload() -> String {
    format!(
        concat!(
            r#"{{"p":"dunes","etching":{{"divisibility":2,"premine":"1000","dune":"{}","#,
            r#""symbol":"¤","terms":{{"amount":"10","cap":"100","height":[null,null],"#,
            r#""offset":[null,null]}},"turbo":true}}}}"#,
        ),
        DUNE_NAME
    )
}

#[tokio::test]
async fn etch_only_creates_the_dune_and_credits_the_premine() {
    let mut cache = fresh_cache(ETCH_BLOCK);
    let provider = StubProvider {
        funding_height: Some(ETCH_BLOCK - 6),
    };

    let mut input = spend_input(PREV_A, 0);
    input.witness = commitment_witness(DUNE_NAME);
    let tx = build_tx(
        vec![input],
        vec![op_return_out(&etch_payload()), payment_out(10, 5_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK, &tx, 1).await;

    let dune_id = cache
        .dune_id_by_protocol(&format!("{}:1", ETCH_BLOCK))
        .found()
        .expect("dune etched");
    let dune = cache.dune(dune_id).unwrap();
    assert_eq!(dune.name, DUNE_NAME);
    assert_eq!(dune.premine, 1000);
    assert_eq!(dune.mints, 0);
    assert_eq!(dune.decimals, 2);
    assert_eq!(dune.mint_cap, Some(100));
    assert!(!dune.unmintable);

    // Premine swept to the first non-OP_RETURN output
    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    let utxo = cache.utxo_by_location(tx_row, 1).found().unwrap();
    let carried = cache.utxo_balances(utxo.id);
    assert_eq!(carried.len(), 1);
    assert_eq!(carried[0].balance, 1000);

    let holder = cache.address_id(&address_string(10));
    assert_eq!(cache.balance(holder, dune_id), 1000);

    let kinds: Vec<EventType> = cache.events().iter().map(|e| e.event_type).collect();
    assert_eq!(kinds, vec![EventType::Etch, EventType::Transfer]);
}

#[tokio::test]
async fn etching_without_commitment_is_rejected() {
    let mut cache = fresh_cache(ETCH_BLOCK);
    // Funding output exists but is too fresh for six confirmations
    let provider = StubProvider {
        funding_height: Some(ETCH_BLOCK - 2),
    };

    let mut input = spend_input(PREV_A, 0);
    input.witness = commitment_witness(DUNE_NAME);
    let tx = build_tx(
        vec![input],
        vec![op_return_out(&etch_payload()), payment_out(10, 5_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK, &tx, 1).await;

    assert_eq!(
        cache.dune_id_by_protocol(&format!("{}:1", ETCH_BLOCK)),
        Lookup::Absent
    );
    assert_eq!(cache.event_count(), 0);
}

#[tokio::test]
async fn etching_below_minimum_name_length_is_rejected() {
    let mut cache = fresh_cache(ETCH_BLOCK);
    let provider = StubProvider {
        funding_height: Some(ETCH_BLOCK - 6),
    };

    // Five letters, far below the launch minimum of thirteen
    let payload = r#"{"p":"dunes","etching":{"dune":"HELLO","premine":"10"}}"#;
    let mut input = spend_input(PREV_A, 0);
    input.witness = commitment_witness("HELLO");
    let tx = build_tx(
        vec![input],
        vec![op_return_out(payload), payment_out(10, 5_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK, &tx, 1).await;

    assert_eq!(
        cache.dune_id_by_protocol(&format!("{}:1", ETCH_BLOCK)),
        Lookup::Absent
    );
}

#[tokio::test]
async fn zero_amount_terms_without_price_reject_the_etching() {
    let mut cache = fresh_cache(ETCH_BLOCK);
    let provider = StubProvider {
        funding_height: Some(ETCH_BLOCK - 6),
    };

    let payload = format!(
        r#"{{"p":"dunes","etching":{{"dune":"{}","terms":{{"amount":"0"}}}}}}"#,
        DUNE_NAME
    );
    let mut input = spend_input(PREV_A, 0);
    input.witness = commitment_witness(DUNE_NAME);
    let tx = build_tx(
        vec![input],
        vec![op_return_out(&payload), payment_out(10, 5_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK, &tx, 1).await;

    assert_eq!(
        cache.dune_id_by_protocol(&format!("{}:1", ETCH_BLOCK)),
        Lookup::Absent
    );
}

#[tokio::test]
async fn mint_after_etch_credits_the_fixed_amount() {
    let mut cache = fresh_cache(ETCH_BLOCK + 1);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );

    let payload = format!(r#"{{"p":"dunes","mint":"{}:1"}}"#, ETCH_BLOCK);
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![op_return_out(&payload), payment_out(11, 7_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 1, &tx, 0).await;

    assert_eq!(cache.dune(dune_id).unwrap().mints, 1);

    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    let utxo = cache.utxo_by_location(tx_row, 1).found().unwrap();
    assert_eq!(cache.utxo_balances(utxo.id)[0].balance, 10);

    let kinds: Vec<EventType> = cache.events().iter().map(|e| e.event_type).collect();
    assert_eq!(kinds, vec![EventType::Mint, EventType::Transfer]);
}

#[tokio::test]
async fn even_split_gives_the_first_outputs_the_extra_units() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );
    seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 11)]);

    // Three outputs, edict output == vout_count: spread over the two
    // non-OP_RETURN outputs
    let payload = format!(
        r#"{{"p":"dunes","edicts":[{{"id":"{}:1","amount":"0","output":3}}]}}"#,
        ETCH_BLOCK
    );
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![
            payment_out(21, 3_000),
            payment_out(22, 3_000),
            op_return_out(&payload),
        ],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    let first = cache.utxo_by_location(tx_row, 0).found().unwrap();
    let second = cache.utxo_by_location(tx_row, 1).found().unwrap();
    assert_eq!(cache.utxo_balances(first.id)[0].balance, 6);
    assert_eq!(cache.utxo_balances(second.id)[0].balance, 5);

    // The spent input no longer counts toward its holder
    let holder = cache.address_id(&address_string(20));
    assert_eq!(cache.balance(holder, dune_id), 0);
}

#[tokio::test]
async fn per_output_edicts_cap_at_the_remaining_bag() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );
    seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 7)]);

    let payload = format!(
        concat!(
            r#"{{"p":"dunes","edicts":["#,
            r#"{{"id":"{0}:1","amount":"5","output":0}},"#,
            r#"{{"id":"{0}:1","amount":"0","output":1}}]}}"#,
        ),
        ETCH_BLOCK
    );
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![
            payment_out(21, 3_000),
            payment_out(22, 3_000),
            op_return_out(&payload),
        ],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    let first = cache.utxo_by_location(tx_row, 0).found().unwrap();
    let second = cache.utxo_by_location(tx_row, 1).found().unwrap();
    assert_eq!(cache.utxo_balances(first.id)[0].balance, 5);
    assert_eq!(cache.utxo_balances(second.id)[0].balance, 2);
}

#[tokio::test]
async fn cenotaph_burns_the_inputs_entirely() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );
    seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 11)]);

    // output 99 on a three-vout transaction: decoder flags a cenotaph
    let payload = format!(
        r#"{{"p":"dunes","edicts":[{{"id":"{}:1","amount":"5","output":99}}]}}"#,
        ETCH_BLOCK
    );
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![
            payment_out(21, 3_000),
            payment_out(22, 3_000),
            op_return_out(&payload),
        ],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    assert_eq!(cache.dune(dune_id).unwrap().burnt_amount, 11);

    // No pending output received anything
    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    assert_eq!(cache.utxo_by_location(tx_row, 0), Lookup::Absent);
    assert_eq!(cache.utxo_by_location(tx_row, 1), Lookup::Absent);

    let holder = cache.address_id(&address_string(20));
    assert_eq!(cache.balance(holder, dune_id), 0);

    let kinds: Vec<EventType> = cache.events().iter().map(|e| e.event_type).collect();
    assert_eq!(kinds, vec![EventType::Burn]);
}

#[tokio::test]
async fn flex_mint_credits_paid_sats_over_unit_price() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let pay_to = address_string(30);
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        Dune {
            mint_amount: Some(0),
            mint_cap: None,
            price_amount: Some(1_000),
            price_pay_to: Some(pay_to),
            ..default_dune()
        },
    );

    let payload = format!(r#"{{"p":"dunes","mint":"{}:1"}}"#, ETCH_BLOCK);
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![payment_out(30, 4_500), op_return_out(&payload)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    let dune = cache.dune(dune_id).unwrap();
    assert_eq!(dune.mints, 1);

    // floor(4500 / 1000) = 4 units, swept to the payment output
    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    let utxo = cache.utxo_by_location(tx_row, 0).found().unwrap();
    assert_eq!(cache.utxo_balances(utxo.id)[0].balance, 4);
}

#[tokio::test]
async fn mint_beyond_cap_is_ignored() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        Dune {
            mints: 100,
            ..default_dune()
        },
    );

    let payload = format!(r#"{{"p":"dunes","mint":"{}:1"}}"#, ETCH_BLOCK);
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![payment_out(11, 7_000), op_return_out(&payload)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    assert_eq!(cache.dune(dune_id).unwrap().mints, 100);
    assert_eq!(cache.event_count(), 0);
}

#[tokio::test]
async fn pointer_directs_the_residue() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );
    seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 9)]);

    let payload = r#"{"p":"dunes","pointer":1}"#;
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![
            payment_out(21, 3_000),
            payment_out(22, 3_000),
            op_return_out(payload),
        ],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    assert_eq!(cache.utxo_by_location(tx_row, 0), Lookup::Absent);
    let target = cache.utxo_by_location(tx_row, 1).found().unwrap();
    assert_eq!(cache.utxo_balances(target.id)[0].balance, 9);
}

#[tokio::test]
async fn plain_spend_moves_balances_to_the_first_output() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );
    seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 13)]);

    // No OP_RETURN at all: carried dunes follow the first output
    let tx = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![payment_out(21, 3_000), payment_out(22, 3_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

    let tx_row = cache
        .transaction_id_by_hash(&tx.txid().to_string())
        .found()
        .unwrap();
    let first = cache.utxo_by_location(tx_row, 0).found().unwrap();
    assert_eq!(cache.utxo_balances(first.id)[0].balance, 13);

    let new_holder = cache.address_id(&address_string(21));
    assert_eq!(cache.balance(new_holder, dune_id), 13);
}

#[tokio::test]
async fn spent_utxos_are_never_respendable() {
    let mut cache = fresh_cache(ETCH_BLOCK + 2);
    let provider = StubProvider::default();
    let dune_id = seed_dune(
        &mut cache,
        &format!("{}:1", ETCH_BLOCK),
        DUNE_NAME,
        default_dune(),
    );
    seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 5)]);

    let first = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![payment_out(21, 3_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &first, 0).await;

    let holder = cache.address_id(&address_string(21));
    assert_eq!(cache.balance(holder, dune_id), 5);

    // A second spend of the same outpoint resolves to nothing and is a no-op
    let second = build_tx(
        vec![spend_input(PREV_A, 0)],
        vec![payment_out(22, 3_000)],
    );
    apply(&mut cache, &provider, ETCH_BLOCK + 2, &second, 1).await;

    assert_eq!(cache.balance(holder, dune_id), 5);
    let other = cache.address_id(&address_string(22));
    assert_eq!(cache.balance(other, dune_id), 0);
}

#[tokio::test]
async fn genesis_coinbase_synthesizes_the_genesis_dune() {
    let mut cache = fresh_cache(840_000);
    let provider = StubProvider::default();

    let coinbase = build_tx(vec![coinbase_input()], vec![payment_out(40, 312_500_000)]);
    apply(&mut cache, &provider, 840_000, &coinbase, 0).await;

    let dune_id = cache.dune_id_by_protocol("1:0").found().expect("genesis");
    let dune = cache.dune(dune_id).unwrap();
    assert_eq!(dune.name, "UNCOMMONGOODS");
    assert_eq!(dune.mint_amount, Some(1));
    assert_eq!(dune.mint_cap, Some(u128::MAX));
    assert_eq!(dune.mint_start, Some(840_000));
    assert_eq!(dune.mint_end, Some(1_050_000));
    assert!(!dune.unmintable);

    // And it mints
    let payload = r#"{"p":"dunes","mint":"1:0"}"#;
    let tx = build_tx(
        vec![spend_input(PREV_B, 0)],
        vec![payment_out(41, 1_000), op_return_out(payload)],
    );
    apply(&mut cache, &provider, 840_001, &tx, 0).await;
    assert_eq!(cache.dune(dune_id).unwrap().mints, 1);
}

#[tokio::test]
async fn identical_input_produces_identical_flushes() {
    let provider = StubProvider::default();

    let mut flushes = Vec::new();
    for _ in 0..2 {
        let mut cache = fresh_cache(ETCH_BLOCK + 2);
        let dune_id = seed_dune(
            &mut cache,
            &format!("{}:1", ETCH_BLOCK),
            DUNE_NAME,
            default_dune(),
        );
        seed_utxo(&mut cache, PREV_A, 0, 20, &[(dune_id, 11)]);

        let payload = format!(
            r#"{{"p":"dunes","edicts":[{{"id":"{}:1","amount":"0","output":3}}]}}"#,
            ETCH_BLOCK
        );
        let tx = build_tx(
            vec![spend_input(PREV_A, 0)],
            vec![
                payment_out(21, 3_000),
                payment_out(22, 3_000),
                op_return_out(&payload),
            ],
        );
        apply(&mut cache, &provider, ETCH_BLOCK + 2, &tx, 0).await;

        let (flush, _) = cache.into_flush("mainnet", "hash", false);
        flushes.push(flush);
    }

    assert_eq!(flushes[0], flushes[1]);
}
