//! Step G: finalization. Emits transfer and burn events, marks inputs spent,
//! applies burns to the dunes, persists the dune-bearing outputs, and keeps
//! the address aggregates in lockstep with the utxo set.

use crate::domain::constants::OP_RETURN_ADDRESS_ID;
use crate::domain::errors::DuneError;
use crate::domain::lot;
use crate::domain::models::EventType;
use crate::infrastructure::persistence::BlockCache;

use super::TxContext;

pub(crate) fn finalize(
    cache: &mut BlockCache,
    height: u32,
    ctx: &mut TxContext,
) -> Result<(), DuneError> {
    // Transfer events precede burn events for deterministic replay
    for (to_address_id, dunes) in &ctx.transfers {
        for (dune_id, amount) in dunes {
            cache.push_event(
                EventType::Transfer,
                ctx.transaction_id,
                *dune_id,
                *amount,
                ctx.sender_address_id,
                *to_address_id,
            );
        }
    }

    for (dune_id, amount) in &ctx.burned {
        if *amount == 0 {
            continue;
        }
        cache.push_event(
            EventType::Burn,
            ctx.transaction_id,
            *dune_id,
            *amount,
            ctx.sender_address_id,
            OP_RETURN_ADDRESS_ID,
        );
        if let Some(dune) = cache.dune_mut(*dune_id) {
            dune.burnt_amount = lot::checked_add(dune.burnt_amount, *amount, "burnt amount")?;
        }
    }

    // Consume the inputs: spend markers and aggregate decrements
    for utxo in &ctx.input_utxos {
        cache.mark_utxo_spent(utxo.id, height, ctx.transaction_id);
        let carried = cache.utxo_balances(utxo.id).to_vec();
        for balance in carried {
            let current = cache.balance(utxo.address_id, balance.dune_id);
            cache.set_balance(
                utxo.address_id,
                balance.dune_id,
                lot::checked_sub(current, balance.balance, "aggregate decrement")?,
            );
        }
    }

    // Persist the dune-bearing outputs; OP_RETURN and empty outputs vanish
    for pending in &ctx.pending {
        if pending.is_op_return {
            continue;
        }
        let total: u128 = pending.dune_balances.values().sum();
        if total == 0 {
            continue;
        }

        cache.create_utxo(
            ctx.transaction_id,
            pending.vout_index as i32,
            pending.address_id,
            pending.value_sats,
            &pending.dune_balances,
        );

        for (dune_id, amount) in &pending.dune_balances {
            if *amount == 0 {
                continue;
            }
            let current = cache.balance(pending.address_id, *dune_id);
            cache.set_balance(
                pending.address_id,
                *dune_id,
                lot::checked_add(current, *amount, "aggregate increment")?,
            );
        }
    }

    Ok(())
}
