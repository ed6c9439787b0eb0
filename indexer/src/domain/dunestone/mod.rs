//! Dunestone decoding.
//!
//! A dunestone is the protocol message embedded in the first OP_RETURN output
//! of a transaction as UTF-8 JSON. Decoding never fails: a transaction with
//! no OP_RETURN yields an empty dunestone, and any malformed or invalid
//! payload yields a cenotaph, which burns the input balances downstream.

mod dune_id;
mod edict;
mod etching;

pub use dune_id::DuneId;
pub use edict::Edict;
pub use etching::{Etching, PriceTerms, Terms};

use bitcoincore_rpc::bitcoin::blockdata::script::Instruction;
use bitcoincore_rpc::bitcoin::opcodes::all::OP_RETURN;
use bitcoincore_rpc::bitcoin::{Script, Transaction};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::domain::constants::PROTOCOL_TAGS;
use crate::domain::lot;

lazy_static! {
    static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]{1,31}$").unwrap();
}

/// Decoded protocol message of a single transaction
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Dunestone {
    pub edicts: Vec<Edict>,
    pub etching: Option<Etching>,
    pub mint: Option<DuneId>,
    pub pointer: Option<u32>,
    /// Malformed or invalid message; input balances are burned
    pub cenotaph: bool,
}

/// Raw payload shape prior to validation; amount-bearing fields arrive as
/// decimal strings so they can span the full u128 range
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDunestone {
    p: String,
    edicts: Option<Vec<RawEdict>>,
    etching: Option<RawEtching>,
    mint: Option<String>,
    pointer: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEdict {
    id: String,
    amount: String,
    output: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEtching {
    divisibility: Option<u8>,
    premine: Option<String>,
    dune: Option<String>,
    symbol: Option<String>,
    terms: Option<RawTerms>,
    turbo: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTerms {
    amount: Option<String>,
    cap: Option<String>,
    height: Option<(Option<u32>, Option<u32>)>,
    offset: Option<(Option<u32>, Option<u32>)>,
    price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPrice {
    amount: u64,
    pay_to: String,
}

impl Dunestone {
    /// Decode the dunestone carried by `tx`, if any
    pub fn from_transaction(tx: &Transaction) -> Dunestone {
        let Some(script) = tx
            .output
            .iter()
            .map(|out| out.script_pubkey.as_script())
            .find(|script| script.is_op_return())
        else {
            // No OP_RETURN: plain transaction, inputs flow through untouched
            return Dunestone::default();
        };

        let Some(payload) = extract_payload(script) else {
            return Dunestone::cenotaph();
        };

        let raw: RawDunestone = match serde_json::from_slice(&payload) {
            Ok(raw) => raw,
            Err(_) => return Dunestone::cenotaph(),
        };

        Self::from_raw(raw, tx.output.len() as u32)
    }

    /// A dunestone that burns everything and carries no actions
    pub fn cenotaph() -> Dunestone {
        Dunestone {
            cenotaph: true,
            ..Dunestone::default()
        }
    }

    /// Whether the message carries any of the four operations
    pub fn has_actions(&self) -> bool {
        self.etching.is_some() || self.mint.is_some() || !self.edicts.is_empty()
    }

    fn from_raw(raw: RawDunestone, vout_count: u32) -> Dunestone {
        if !PROTOCOL_TAGS.contains(&raw.p.as_str()) {
            return Dunestone::cenotaph();
        }

        let mut cenotaph = false;

        // A malformed component invalidates the message but the remaining
        // well-formed components still reach the engine: a cenotaph etching
        // creates an unmintable dune and a cenotaph mint burns its output.
        let etching = match raw.etching.map(validate_etching) {
            Some(Ok(etching)) => Some(etching),
            Some(Err(())) => {
                cenotaph = true;
                None
            }
            None => None,
        };

        let mint = match raw.mint.as_deref().map(str::parse::<DuneId>) {
            Some(Ok(id)) => Some(id),
            Some(Err(())) => {
                cenotaph = true;
                None
            }
            None => None,
        };

        let mut edicts = Vec::new();
        for raw_edict in raw.edicts.unwrap_or_default() {
            match validate_edict(&raw_edict, vout_count) {
                Ok(edict) => edicts.push(edict),
                Err(()) => {
                    cenotaph = true;
                    edicts.clear();
                    break;
                }
            }
        }

        Dunestone {
            edicts,
            etching,
            mint,
            pointer: raw.pointer,
            cenotaph,
        }
    }
}

/// Pull the payload bytes out of an OP_RETURN script: the single push after
/// the opcode, with any OP_PUSHDATA length prefix already consumed
fn extract_payload(script: &Script) -> Option<Vec<u8>> {
    let mut instructions = script.instructions();

    match instructions.next() {
        Some(Ok(Instruction::Op(op))) if op == OP_RETURN => {}
        _ => return None,
    }

    let payload = match instructions.next() {
        Some(Ok(Instruction::PushBytes(push))) if !push.is_empty() => push.as_bytes().to_vec(),
        _ => return None,
    };

    // The payload must exhaust the script; trailing data is malformed
    match instructions.next() {
        None => Some(payload),
        Some(_) => None,
    }
}

fn validate_edict(raw: &RawEdict, vout_count: u32) -> Result<Edict, ()> {
    let id: DuneId = raw.id.parse()?;

    // `0:t` is only meaningful as the self-reference `0:0`
    if id.block == 0 && id.tx != 0 {
        return Err(());
    }

    let amount = lot::parse_amount(&raw.amount).ok_or(())?;

    // Equality with the vout count selects the spread form
    if u32::from(raw.output) > vout_count {
        return Err(());
    }

    Ok(Edict {
        id,
        amount,
        output: raw.output,
    })
}

fn validate_etching(raw: RawEtching) -> Result<Etching, ()> {
    let divisibility = raw.divisibility.unwrap_or(0);
    if divisibility > Etching::MAX_DIVISIBILITY {
        return Err(());
    }

    let premine = match raw.premine.as_deref() {
        Some(s) => lot::parse_amount(s).ok_or(())?,
        None => 0,
    };

    if let Some(name) = raw.dune.as_deref() {
        if !NAME_RE.is_match(name) {
            return Err(());
        }
    }

    let symbol = match raw.symbol.as_deref() {
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => return Err(()),
            }
        }
        None => None,
    };

    let terms = match raw.terms {
        Some(raw_terms) => Some(validate_terms(raw_terms)?),
        None => None,
    };

    Ok(Etching {
        divisibility,
        premine,
        dune: raw.dune,
        symbol,
        terms,
        turbo: raw.turbo.unwrap_or(true),
    })
}

fn validate_terms(raw: RawTerms) -> Result<Terms, ()> {
    let amount = match raw.amount.as_deref() {
        Some(s) => Some(lot::parse_amount(s).ok_or(())?),
        None => None,
    };

    let cap = match raw.cap.as_deref() {
        Some(s) => Some(lot::parse_amount(s).ok_or(())?),
        None => None,
    };

    let price = match raw.price {
        Some(raw_price) => {
            if raw_price.amount == 0 || raw_price.pay_to.is_empty() {
                return Err(());
            }
            Some(PriceTerms {
                amount: raw_price.amount,
                pay_to: raw_price.pay_to,
            })
        }
        None => None,
    };

    Ok(Terms {
        amount,
        cap,
        height: raw.height.unwrap_or((None, None)),
        offset: raw.offset.unwrap_or((None, None)),
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoincore_rpc::bitcoin::absolute::LockTime;
    use bitcoincore_rpc::bitcoin::script::PushBytesBuf;
    use bitcoincore_rpc::bitcoin::transaction::Version;
    use bitcoincore_rpc::bitcoin::{Amount, ScriptBuf, Transaction, TxOut};

    fn tx_with_outputs(payload: Option<&str>, extra_outputs: usize) -> Transaction {
        let mut output = Vec::new();
        if let Some(payload) = payload {
            let data = PushBytesBuf::try_from(payload.as_bytes().to_vec()).unwrap();
            output.push(TxOut {
                value: Amount::ZERO,
                script_pubkey: ScriptBuf::new_op_return(&data),
            });
        }
        for _ in 0..extra_outputs {
            output.push(TxOut {
                value: Amount::from_sat(10_000),
                script_pubkey: ScriptBuf::new(),
            });
        }
        Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: Vec::new(),
            output,
        }
    }

    #[test]
    fn transaction_without_op_return_is_a_noop() {
        let stone = Dunestone::from_transaction(&tx_with_outputs(None, 2));
        assert_eq!(stone, Dunestone::default());
        assert!(!stone.cenotaph);
        assert!(!stone.has_actions());
    }

    #[test]
    fn malformed_json_is_a_cenotaph() {
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some("{not json"), 1));
        assert!(stone.cenotaph);
        assert!(!stone.has_actions());
    }

    #[test]
    fn wrong_protocol_tag_is_a_cenotaph() {
        let stone =
            Dunestone::from_transaction(&tx_with_outputs(Some(r#"{"p":"ordinals"}"#), 1));
        assert!(stone.cenotaph);
    }

    #[test]
    fn unknown_field_is_a_cenotaph() {
        let stone = Dunestone::from_transaction(&tx_with_outputs(
            Some(r#"{"p":"dunes","bogus":1}"#),
            1,
        ));
        assert!(stone.cenotaph);
    }

    #[test]
    fn minimal_valid_dunestone() {
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(r#"{"p":"dunes"}"#), 1));
        assert!(!stone.cenotaph);
        assert!(!stone.has_actions());
    }

    #[test]
    fn decodes_a_full_etching() {
        let payload = r#"{
            "p": "dunes",
            "etching": {
                "divisibility": 2,
                "premine": "1000",
                "dune": "HELLO",
                "symbol": "¤",
                "terms": {
                    "amount": "10",
                    "cap": "100",
                    "height": [null, null],
                    "offset": [null, null]
                },
                "turbo": true
            }
        }"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 2));
        assert!(!stone.cenotaph);
        let etching = stone.etching.unwrap();
        assert_eq!(etching.divisibility, 2);
        assert_eq!(etching.premine, 1000);
        assert_eq!(etching.dune.as_deref(), Some("HELLO"));
        assert_eq!(etching.symbol, Some('\u{a4}'));
        assert!(etching.turbo);
        let terms = etching.terms.unwrap();
        assert_eq!(terms.amount, Some(10));
        assert_eq!(terms.cap, Some(100));
        assert_eq!(terms.height, (None, None));
    }

    #[test]
    fn decodes_mint_and_pointer() {
        let stone = Dunestone::from_transaction(&tx_with_outputs(
            Some(r#"{"p":"dunes","mint":"840100:3","pointer":1}"#),
            2,
        ));
        assert!(!stone.cenotaph);
        assert_eq!(stone.mint, Some(DuneId::new(840_100, 3)));
        assert_eq!(stone.pointer, Some(1));
    }

    #[test]
    fn edict_output_beyond_vout_count_is_a_cenotaph() {
        let payload = r#"{"p":"dunes","edicts":[{"id":"840100:1","amount":"5","output":99}]}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 2));
        assert!(stone.cenotaph);
        assert!(stone.edicts.is_empty());
    }

    #[test]
    fn output_beyond_u8_fails_schema_validation_entirely() {
        // 301 vouts, so 280 would be in range if the schema allowed it, but
        // the wire format fixes `output` at u8: the whole message fails
        // schema validation and even the etching does not survive
        let payload = concat!(
            r#"{"p":"dunes","#,
            r#""etching":{"dune":"HELLO"},"#,
            r#""edicts":[{"id":"840100:1","amount":"1","output":280}]}"#,
        );
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 300));
        assert!(stone.cenotaph);
        assert!(stone.etching.is_none());
        assert!(stone.edicts.is_empty());
    }

    #[test]
    fn edict_output_equal_to_vout_count_is_the_spread_form() {
        let payload = r#"{"p":"dunes","edicts":[{"id":"840100:1","amount":"0","output":3}]}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 2));
        assert!(!stone.cenotaph);
        assert_eq!(stone.edicts.len(), 1);
        assert_eq!(stone.edicts[0].output, 3);
    }

    #[test]
    fn zero_block_nonzero_tx_edict_id_is_a_cenotaph() {
        let payload = r#"{"p":"dunes","edicts":[{"id":"0:5","amount":"1","output":0}]}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 2));
        assert!(stone.cenotaph);
    }

    #[test]
    fn self_reference_edict_id_is_kept() {
        let payload = r#"{"p":"dunes","edicts":[{"id":"0:0","amount":"1","output":0}]}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 2));
        assert!(!stone.cenotaph);
        assert!(stone.edicts[0].id.is_self_reference());
    }

    #[test]
    fn out_of_range_amount_is_a_cenotaph_but_keeps_the_etching() {
        let payload = concat!(
            r#"{"p":"dunes","#,
            r#""etching":{"dune":"HELLO"},"#,
            r#""edicts":[{"id":"840100:1","amount":"340282366920938463463374607431768211456","output":0}]}"#,
        );
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 2));
        assert!(stone.cenotaph);
        assert!(stone.edicts.is_empty());
        assert_eq!(stone.etching.unwrap().dune.as_deref(), Some("HELLO"));
    }

    #[test]
    fn invalid_etching_name_is_a_cenotaph() {
        let payload = r#"{"p":"dunes","etching":{"dune":"HAS SPACE"}}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 1));
        assert!(stone.cenotaph);
        assert!(stone.etching.is_none());
    }

    #[test]
    fn multi_codepoint_symbol_is_a_cenotaph() {
        let payload = r#"{"p":"dunes","etching":{"dune":"HELLO","symbol":"ab"}}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 1));
        assert!(stone.cenotaph);
    }

    #[test]
    fn divisibility_above_eighteen_is_a_cenotaph() {
        let payload = r#"{"p":"dunes","etching":{"dune":"HELLO","divisibility":19}}"#;
        let stone = Dunestone::from_transaction(&tx_with_outputs(Some(payload), 1));
        assert!(stone.cenotaph);
    }

    #[test]
    fn trailing_script_data_after_the_payload_is_a_cenotaph() {
        let payload = PushBytesBuf::try_from(br#"{"p":"dunes"}"#.to_vec()).unwrap();
        let extra = PushBytesBuf::try_from(b"extra".to_vec()).unwrap();
        let mut script = ScriptBuf::new();
        script.push_opcode(OP_RETURN);
        script.push_slice(&payload);
        script.push_slice(&extra);

        let tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: Vec::new(),
            output: vec![
                TxOut {
                    value: Amount::ZERO,
                    script_pubkey: script,
                },
                TxOut {
                    value: Amount::from_sat(10_000),
                    script_pubkey: ScriptBuf::new(),
                },
            ],
        };
        let stone = Dunestone::from_transaction(&tx);
        assert!(stone.cenotaph);
    }

    #[test]
    fn only_the_first_op_return_is_decoded() {
        let first = PushBytesBuf::try_from(br#"{"p":"dunes","pointer":1}"#.to_vec()).unwrap();
        let second = PushBytesBuf::try_from(b"{garbage".to_vec()).unwrap();
        let tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: Vec::new(),
            output: vec![
                TxOut {
                    value: Amount::ZERO,
                    script_pubkey: ScriptBuf::new_op_return(&first),
                },
                TxOut {
                    value: Amount::ZERO,
                    script_pubkey: ScriptBuf::new_op_return(&second),
                },
            ],
        };
        let stone = Dunestone::from_transaction(&tx);
        assert!(!stone.cenotaph);
        assert_eq!(stone.pointer, Some(1));
    }
}
