//! Step C: etching.
//!
//! Every rejection here is silent: the etching is dropped and the rest of
//! the transaction still executes.

use bitcoincore_rpc::bitcoin::Transaction;

use crate::domain::constants::{COINBASE_ADDRESS_ID, GENESIS_DUNE_PROTOCOL_ID};
use crate::domain::dune_name::DuneName;
use crate::domain::dunestone::Etching;
use crate::domain::errors::DuneError;
use crate::domain::lot;
use crate::domain::models::{Dune, EventType};
use crate::domain::rules;
use crate::infrastructure::bitcoin::BitcoinProvider;
use crate::infrastructure::persistence::{BlockCache, Lookup};

use super::{commitment, TxContext};

/// Apply an etching; returns the new dune's row id, or `None` when the
/// etching is rejected
pub(crate) async fn apply_etching(
    cache: &mut BlockCache,
    provider: &dyn BitcoinProvider,
    height: u32,
    ctx: &mut TxContext,
    tx: &Transaction,
    etching: &Etching,
    is_genesis: bool,
) -> Result<Option<i64>, DuneError> {
    let protocol_id = if is_genesis {
        GENESIS_DUNE_PROTOCOL_ID.to_string()
    } else {
        format!("{}:{}", height, ctx.tx_index)
    };

    if let Lookup::Found(_) = cache.dune_id_by_protocol(&protocol_id) {
        return Ok(None);
    }

    // Names are case-insensitive; unnamed etchings draw from the reserved
    // space, which cannot collide with anything suppliable
    let name = match etching.dune.as_deref() {
        Some(supplied) => {
            let name = supplied.to_uppercase();
            if cache.dune_name_taken(&name) {
                return Ok(None);
            }
            if (name.chars().count() as u32) < rules::minimum_name_length(height) {
                return Ok(None);
            }
            name
        }
        None => DuneName::reserved(height, ctx.tx_index).to_string(),
    };

    let terms = etching.terms.as_ref();
    let flex = etching.is_flex();

    // A zero per-mint amount only makes sense with price terms
    if terms.and_then(|t| t.amount) == Some(0) && !flex {
        return Ok(None);
    }
    // A flex dune's supply is bounded by payment, never by cap
    if flex && terms.and_then(|t| t.cap).is_some() {
        return Ok(None);
    }

    if !is_genesis && etching.dune.is_some() {
        let Ok(name_value) = name.parse::<DuneName>() else {
            // No base-26 interpretation means no commitment can exist
            return Ok(None);
        };
        if !commitment::has_valid_commitment(provider, tx, name_value, height).await? {
            return Ok(None);
        }
    }

    let unmintable = ctx.cenotaph || (terms.and_then(|t| t.amount).is_none() && !flex);
    let deployer_address_id = if is_genesis {
        COINBASE_ADDRESS_ID
    } else {
        ctx.sender_address_id
    };

    let dune = Dune {
        id: 0, // assigned by the cache
        dune_protocol_id: protocol_id,
        name,
        symbol: etching.symbol.map(String::from),
        decimals: etching.divisibility,
        premine: etching.premine,
        mints: 0,
        mint_cap: terms.and_then(|t| t.cap),
        mint_amount: terms.and_then(|t| t.amount),
        mint_start: terms.and_then(|t| t.height.0),
        mint_end: terms.and_then(|t| t.height.1),
        mint_offset_start: terms.and_then(|t| t.offset.0),
        mint_offset_end: terms.and_then(|t| t.offset.1),
        price_amount: terms.and_then(|t| t.price.as_ref()).map(|p| p.amount),
        price_pay_to: terms
            .and_then(|t| t.price.as_ref())
            .map(|p| p.pay_to.clone()),
        turbo: etching.turbo,
        unmintable,
        burnt_amount: 0,
        etch_transaction_id: ctx.transaction_id,
        deployer_address_id,
    };
    let dune_id = cache.create_dune(dune);

    cache.push_event(
        EventType::Etch,
        ctx.transaction_id,
        dune_id,
        etching.premine,
        COINBASE_ADDRESS_ID,
        deployer_address_id,
    );

    if etching.premine > 0 {
        if ctx.cenotaph {
            // Premine of a cenotaph etching is created burned
            let entry = ctx.burned.entry(dune_id).or_default();
            *entry = lot::checked_add(*entry, etching.premine, "cenotaph premine")?;
        } else {
            let entry = ctx.unallocated.entry(dune_id).or_default();
            *entry = lot::checked_add(*entry, etching.premine, "premine")?;
        }
    }

    Ok(Some(dune_id))
}
