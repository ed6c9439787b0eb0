//! Taproot name-commitment verification.
//!
//! A non-reserved etching is only valid when one of the transaction's inputs
//! reveals, in its tapscript, a push of the name's commitment bytes, and the
//! output that input spends is a taproot output old enough to have the
//! required confirmations.

use bitcoincore_rpc::bitcoin::blockdata::script::Instruction;
use bitcoincore_rpc::bitcoin::taproot::TAPROOT_ANNEX_PREFIX;
use bitcoincore_rpc::bitcoin::{Script, Transaction, Witness};

use crate::domain::constants::{COMMIT_CONFIRMATIONS, TAPROOT_SCRIPT_PUBKEY_TYPE};
use crate::domain::dune_name::DuneName;
use crate::domain::errors::DuneError;
use crate::infrastructure::bitcoin::BitcoinProvider;

/// Whether `tx` proves a commitment to `name` made at least
/// `COMMIT_CONFIRMATIONS` blocks before `height`.
///
/// RPC failures are fatal: without the funding transaction the etching can
/// be neither accepted nor rejected, so the block aborts.
pub(crate) async fn has_valid_commitment(
    provider: &dyn BitcoinProvider,
    tx: &Transaction,
    name: DuneName,
    height: u32,
) -> Result<bool, DuneError> {
    let commitment = name.commitment();
    if commitment.is_empty() {
        return Ok(false);
    }

    for input in &tx.input {
        if input.previous_output.is_null() {
            continue;
        }

        let Some(tapscript) = tapscript_bytes(&input.witness) else {
            continue;
        };
        if !script_contains_push(Script::from_bytes(tapscript), &commitment) {
            continue;
        }

        let info = provider
            .get_prevout_info(&input.previous_output.txid, input.previous_output.vout)
            .await?;
        let Some(info) = info else {
            continue;
        };

        if info.script_pubkey_type.as_deref() != Some(TAPROOT_SCRIPT_PUBKEY_TYPE) {
            continue;
        }
        let Some(funding_height) = info.block_height else {
            continue;
        };

        let confirmations = height.saturating_sub(funding_height) + 1;
        if confirmations >= COMMIT_CONFIRMATIONS {
            return Ok(true);
        }
    }

    Ok(false)
}

/// The tapscript element of a witness stack: second from the end, or third
/// when the stack carries an annex
fn tapscript_bytes(witness: &Witness) -> Option<&[u8]> {
    let len = witness.len();
    let last = witness.last()?;

    let offset = if len >= 2 && last.first() == Some(&TAPROOT_ANNEX_PREFIX) {
        3
    } else {
        2
    };

    if len < offset {
        return None;
    }
    witness.nth(len - offset)
}

fn script_contains_push(script: &Script, needle: &[u8]) -> bool {
    for instruction in script.instructions() {
        match instruction {
            Ok(Instruction::PushBytes(push)) if push.as_bytes() == needle => return true,
            Ok(_) => continue,
            // Not a decodable script, so not a commitment reveal
            Err(_) => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoincore_rpc::bitcoin::script::PushBytesBuf;
    use bitcoincore_rpc::bitcoin::ScriptBuf;

    fn reveal_script(commitment: &[u8]) -> ScriptBuf {
        let push = PushBytesBuf::try_from(commitment.to_vec()).unwrap();
        let mut script = ScriptBuf::new();
        script.push_slice(&push);
        script
    }

    #[test]
    fn tapscript_position_without_annex() {
        let name: DuneName = "HELLO".parse().unwrap();
        let script = reveal_script(&name.commitment());

        let mut witness = Witness::new();
        witness.push(script.as_bytes());
        witness.push([0xc0]); // control block
        assert_eq!(tapscript_bytes(&witness), Some(script.as_bytes()));
    }

    #[test]
    fn tapscript_position_with_annex() {
        let name: DuneName = "HELLO".parse().unwrap();
        let script = reveal_script(&name.commitment());

        let mut witness = Witness::new();
        witness.push(script.as_bytes());
        witness.push([0xc0]);
        witness.push([TAPROOT_ANNEX_PREFIX, 0x01]);
        assert_eq!(tapscript_bytes(&witness), Some(script.as_bytes()));
    }

    #[test]
    fn short_stack_has_no_tapscript() {
        let mut witness = Witness::new();
        witness.push([0x01]);
        assert_eq!(tapscript_bytes(&witness), None);
        assert_eq!(tapscript_bytes(&Witness::new()), None);
    }

    #[test]
    fn detects_commitment_push() {
        let name: DuneName = "HELLO".parse().unwrap();
        let commitment = name.commitment();
        assert!(script_contains_push(&reveal_script(&commitment), &commitment));

        let other: DuneName = "WORLD".parse().unwrap();
        assert!(!script_contains_push(
            &reveal_script(&other.commitment()),
            &commitment
        ));
    }
}
