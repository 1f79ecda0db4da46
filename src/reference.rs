//! Resolution of existing objects a transaction relies on.
//!
//! An object cell can prove its participation in three ways. When its
//! deployment supports lock proxies and its lock is both funding the
//! transaction and receiving outputs, unlocking any cell with that lock is
//! proof enough and the object is only added as a cell dep. Otherwise the
//! object is consumed and recreated unchanged. Fee-gated delegation objects
//! may instead be paid their owner's minimal payment.

use ckb_logger::debug;
use ckb_spore_codec::{Action, layout::unpack_byte32};
use ckb_spore_config::{ScriptEntry, ScriptKind};
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::{Funding, SetupOptions, TransactionSkeleton};
use ckb_spore_traits::Cell;
use ckb_types::{bytes::Bytes, core::Capacity, packed, prelude::*};

use crate::{
    Reference, Resolution,
    context::{SporeContext, object_dep, type_script_of},
    object::transfer_action,
};

/// The strategy [`choose_strategy`] settles on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceStrategy {
    LockProxy,
    Cell,
}

/// Picks lock proxy iff the deployment supports it and `lock` is among both
/// the funding sources and `output_locks`.
pub fn choose_strategy(
    entry: &ScriptEntry,
    lock: &packed::Script,
    funding: &Funding,
    output_locks: &[packed::Script],
) -> ReferenceStrategy {
    if entry.behaviors.lock_proxy && funding.is_source(lock) && output_locks.contains(lock) {
        ReferenceStrategy::LockProxy
    } else {
        ReferenceStrategy::Cell
    }
}

/// Locks the transaction declares as receivers: every output and the change.
pub(crate) fn declared_output_locks(
    skeleton: &TransactionSkeleton,
    funding: &Funding,
) -> Vec<packed::Script> {
    skeleton
        .outputs()
        .iter()
        .map(Cell::lock)
        .chain(std::iter::once(funding.change_lock.clone()))
        .collect()
}

/// The id leading the type script args of an object cell.
pub(crate) fn object_id(cell: &Cell) -> Result<[u8; 32]> {
    let args = type_script_of(cell)?.args().raw_data();
    if args.len() < 32 {
        return Err(Error::invalid_reference(format!(
            "type script args of {} bytes hold no id",
            args.len()
        )));
    }
    Ok(unpack_byte32(&args[..32])?)
}

/// Resolves a live object of `kind` by lock proxy or by consuming it.
///
/// Returns the transfer action of a consumed object when its deployment
/// reads cobuild actions.
pub(crate) fn resolve_reference(
    ctx: &SporeContext,
    skeleton: TransactionSkeleton,
    funding: &Funding,
    kind: ScriptKind,
    cell: Cell,
    entry: &ScriptEntry,
) -> Result<(TransactionSkeleton, Reference, Option<Action>)> {
    let lock = cell.lock();
    let id = object_id(&cell)?;
    let out_point = cell
        .out_point
        .clone()
        .ok_or_else(|| Error::invariant("a referenced object must be live"))?;
    let output_locks = declared_output_locks(&skeleton, funding);
    let strategy = choose_strategy(entry, &lock, funding, &output_locks);
    debug!("reference {} {} by {:?}", kind.name(), out_point, strategy);

    match strategy {
        ReferenceStrategy::LockProxy => {
            let skeleton = skeleton
                .add_cell_dep(object_dep(&cell)?)
                .add_cell_deps(entry.packed_cell_deps());
            let skeleton = unlock_proxy_lock(ctx, skeleton, &lock)?;
            let reference = Reference {
                kind,
                id,
                out_point,
                resolution: Resolution::LockProxy,
            };
            Ok((skeleton, reference, None))
        }
        ReferenceStrategy::Cell => {
            let skeleton = skeleton
                .setup_cell(cell, SetupOptions::recreate_fixed())?
                .add_cell_deps(entry.packed_cell_deps());
            let input_index = skeleton.inputs().len() - 1;
            let output_index = skeleton.outputs().len() - 1;
            let action = if entry.behaviors.cobuild {
                transfer_action(kind, &skeleton, input_index, output_index)?
            } else {
                None
            };
            let reference = Reference {
                kind,
                id,
                out_point,
                resolution: Resolution::Cell {
                    input_index,
                    output_index,
                },
            };
            Ok((skeleton, reference, action))
        }
    }
}

/// Makes sure some input is guarded by `lock`, unlocking one of its pure
/// capacity cells when none is. The cell stays free for capacity balancing,
/// so its surplus returns through the change output.
fn unlock_proxy_lock(
    ctx: &SporeContext,
    skeleton: TransactionSkeleton,
    lock: &packed::Script,
) -> Result<TransactionSkeleton> {
    if skeleton.has_input_with_lock(lock) {
        return Ok(skeleton);
    }
    let proof = ctx
        .indexer
        .collect_cells_by_lock(lock)?
        .into_iter()
        .find(|cell| {
            cell.is_pure_capacity()
                && cell
                    .out_point
                    .as_ref()
                    .is_some_and(|out_point| skeleton.find_input(out_point).is_none())
        })
        .ok_or_else(|| {
            Error::not_found(format!(
                "no capacity cell guarded by {} to prove the lock proxy",
                lock.calc_script_hash()
            ))
        })?;
    debug!("unlock {} to prove the lock proxy", proof.capacity().as_u64());
    skeleton.add_input(proof, 0)
}

/// `max(10^exponent, occupied capacity of an empty cell guarded by lock)`.
pub fn required_payment(exponent: u64, lock: &packed::Script) -> Result<Capacity> {
    let exponent = u32::try_from(exponent).map_err(|_| Error::CapacityOverflow)?;
    let minimal = 10u64
        .checked_pow(exponent)
        .map(Capacity::shannons)
        .ok_or(Error::CapacityOverflow)?;
    let output = packed::CellOutput::new_builder().lock(lock.clone()).build();
    let occupied = Cell::new(output, Bytes::new()).occupied_capacity()?;
    Ok(minimal.max(occupied))
}
