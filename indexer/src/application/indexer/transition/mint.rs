//! Step D: mint. Closed, capped, unknown, or underpriced mints are silently
//! ignored; a cenotaph mint still counts against the cap but its output is
//! burned.

use crate::domain::constants::COINBASE_ADDRESS_ID;
use crate::domain::dunestone::DuneId;
use crate::domain::errors::DuneError;
use crate::domain::lot;
use crate::domain::models::EventType;
use crate::domain::rules::{self, OutputSats};
use crate::infrastructure::persistence::{BlockCache, Lookup};

use super::TxContext;

pub(crate) fn apply_mint(
    cache: &mut BlockCache,
    height: u32,
    ctx: &mut TxContext,
    mint_id: DuneId,
) -> Result<(), DuneError> {
    let Lookup::Found(dune_id) = cache.dune_id_by_protocol(&mint_id.to_string()) else {
        return Ok(());
    };
    let Some(dune) = cache.dune(dune_id).cloned() else {
        return Ok(());
    };

    let outputs: Vec<OutputSats<'_>> = ctx
        .pending
        .iter()
        .map(|pending| OutputSats {
            address: pending.address.as_deref(),
            value_sats: pending.value_sats,
        })
        .collect();

    if !rules::is_price_terms_met(&dune, &outputs) {
        return Ok(());
    }
    if !rules::is_mint_open(height, ctx.tx_index, &dune, true) {
        return Ok(());
    }

    let amount = rules::mint_amount(&dune, &outputs);

    if ctx.cenotaph {
        // The mint consumes a slot under the cap but its units are burned
        if let Some(dune) = cache.dune_mut(dune_id) {
            dune.mints = lot::checked_add(dune.mints, 1, "mints")?;
        }
        if amount > 0 {
            let entry = ctx.burned.entry(dune_id).or_default();
            *entry = lot::checked_add(*entry, amount, "cenotaph mint")?;
        }
        return Ok(());
    }

    if amount == 0 {
        return Ok(());
    }

    if let Some(dune) = cache.dune_mut(dune_id) {
        dune.mints = lot::checked_add(dune.mints, 1, "mints")?;
    }
    cache.push_event(
        EventType::Mint,
        ctx.transaction_id,
        dune_id,
        amount,
        COINBASE_ADDRESS_ID,
        ctx.sender_address_id,
    );

    let entry = ctx.unallocated.entry(dune_id).or_default();
    *entry = lot::checked_add(*entry, amount, "mint")?;

    Ok(())
}
