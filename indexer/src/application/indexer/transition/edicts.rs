//! Steps E and F: edict allocation and the pointer sweep.

use crate::domain::dunestone::Edict;
use crate::domain::errors::DuneError;
use crate::domain::lot;
use crate::infrastructure::persistence::{BlockCache, Lookup};

use super::TxContext;

/// Apply the edicts in declaration order. Under a cenotaph the whole
/// unallocated bag is burned instead.
pub(crate) fn apply_edicts(
    cache: &BlockCache,
    ctx: &mut TxContext,
    edicts: &[Edict],
) -> Result<(), DuneError> {
    if ctx.cenotaph {
        let bag = std::mem::take(&mut ctx.unallocated);
        for (dune_id, amount) in bag {
            let entry = ctx.burned.entry(dune_id).or_default();
            *entry = lot::checked_add(*entry, amount, "cenotaph burn")?;
        }
        return Ok(());
    }

    for edict in edicts {
        // `0:0` targets the dune etched by this very transaction
        let dune_id = if edict.id.is_self_reference() {
            match ctx.etched_dune_id {
                Some(id) => id,
                None => continue,
            }
        } else {
            match cache.dune_id_by_protocol(&edict.id.to_string()) {
                Lookup::Found(id) => id,
                Lookup::Absent => continue,
            }
        };

        if !ctx.unallocated.contains_key(&dune_id) {
            continue;
        }

        let vout_count = ctx.pending.len() as u32;
        if u32::from(edict.output) == vout_count {
            // Spread form: distribute across the non-OP_RETURN outputs
            let destinations: Vec<usize> = ctx
                .pending
                .iter()
                .enumerate()
                .filter_map(|(index, pending)| (!pending.is_op_return).then_some(index))
                .collect();
            if destinations.is_empty() {
                continue;
            }

            if edict.amount == 0 {
                // Even split; the first `remainder` outputs get one extra
                let have = *ctx.unallocated.get(&dune_id).unwrap_or(&0);
                let share = have / destinations.len() as u128;
                let remainder = have % destinations.len() as u128;
                for (position, output_index) in destinations.into_iter().enumerate() {
                    let extra = u128::from((position as u128) < remainder);
                    let amount = share + extra;
                    if amount > 0 {
                        allocate(ctx, output_index, dune_id, amount)?;
                    }
                }
            } else {
                for output_index in destinations {
                    allocate(ctx, output_index, dune_id, edict.amount)?;
                }
            }
        } else {
            allocate(ctx, usize::from(edict.output), dune_id, edict.amount)?;
        }
    }

    Ok(())
}

/// Step F: move whatever remains unallocated to a single output. The pointer
/// wins when in range; otherwise the first non-OP_RETURN output; otherwise
/// any OP_RETURN output, which burns the residue.
pub(crate) fn sweep_pointer(ctx: &mut TxContext, pointer: Option<u32>) -> Result<(), DuneError> {
    if ctx.unallocated.is_empty() {
        return Ok(());
    }

    let target = pointer
        .map(|p| p as usize)
        .filter(|p| *p < ctx.pending.len())
        .or_else(|| {
            ctx.pending
                .iter()
                .position(|pending| !pending.is_op_return)
        })
        .or_else(|| ctx.pending.iter().position(|pending| pending.is_op_return))
        .ok_or_else(|| {
            // A transaction with no outputs cannot exist under consensus rules
            DuneError::ProcessingError(
                "no output available to receive residual balance".to_string(),
            )
        })?;

    let dune_ids: Vec<i64> = ctx.unallocated.keys().copied().collect();
    for dune_id in dune_ids {
        allocate(ctx, target, dune_id, 0)?;
    }

    Ok(())
}

/// The allocation primitive: move up to `amount` of a dune from the bag to a
/// pending output; `0` means everything. Allocations to OP_RETURN outputs
/// are burns.
fn allocate(
    ctx: &mut TxContext,
    output_index: usize,
    dune_id: i64,
    amount: u128,
) -> Result<(), DuneError> {
    let have = *ctx.unallocated.get(&dune_id).unwrap_or(&0);
    if have == 0 {
        return Ok(());
    }

    let give = if amount == 0 || have < amount {
        have
    } else {
        amount
    };

    let rest = lot::checked_sub(have, give, "allocate")?;
    if rest == 0 {
        ctx.unallocated.remove(&dune_id);
    } else {
        ctx.unallocated.insert(dune_id, rest);
    }

    let pending = &mut ctx.pending[output_index];
    let balance = pending.dune_balances.entry(dune_id).or_default();
    *balance = lot::checked_add(*balance, give, "pending balance")?;

    if pending.is_op_return {
        let entry = ctx.burned.entry(dune_id).or_default();
        *entry = lot::checked_add(*entry, give, "op_return burn")?;
    } else {
        let entry = ctx
            .transfers
            .entry(pending.address_id)
            .or_default()
            .entry(dune_id)
            .or_default();
        *entry = lot::checked_add(*entry, give, "transfer")?;
    }

    Ok(())
}
