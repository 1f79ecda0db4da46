//! Steps shared by the operations of every object kind.

use ckb_logger::debug;
use ckb_spore_cobuild::{
    inject_cobuild_proof, melt_cluster_agent_action, melt_cluster_proxy_action,
    melt_spore_action, transfer_cluster_action, transfer_cluster_agent_action,
    transfer_cluster_proxy_action, transfer_spore_action,
};
use ckb_spore_codec::Action;
use ckb_spore_config::{ScriptEntry, ScriptKind};
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::{
    Funding, SetupOptions, TransactionSkeleton, pay_fee_by_fee_rate, pay_fee_by_output,
};
use ckb_spore_traits::Cell;
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellDep, CellOutput, Script},
    prelude::*,
};

use crate::{Assembly, context::SporeContext};

/// Capacity kept above the occupied one when an object is created, 1 CKB.
pub const DEFAULT_CAPACITY_MARGIN: Capacity = Capacity::shannons(100_000_000);

/// Where the fee of a transfer comes from.
///
/// With both set, the capacity margin is tried first.
#[derive(Clone, Copy, Default)]
pub struct FeeOptions<'f, 'a> {
    pub use_capacity_margin: bool,
    pub funding: Option<&'f Funding<'a>>,
}

impl<'f, 'a> FeeOptions<'f, 'a> {
    pub fn capacity_margin() -> Self {
        FeeOptions {
            use_capacity_margin: true,
            funding: None,
        }
    }

    pub fn funding(funding: &'f Funding<'a>) -> Self {
        FeeOptions {
            use_capacity_margin: false,
            funding: Some(funding),
        }
    }

    pub fn with_funding(self, funding: &'f Funding<'a>) -> Self {
        FeeOptions {
            funding: Some(funding),
            ..self
        }
    }
}

/// A new object cell with `margin` above its occupied capacity.
pub(crate) fn new_object_cell(
    entry: &ScriptEntry,
    args: Bytes,
    lock: Script,
    data: Bytes,
    margin: Capacity,
) -> Result<Cell> {
    let output = CellOutput::new_builder()
        .lock(lock)
        .type_(Some(entry.new_script(args)).pack())
        .build();
    let cell = Cell::new(output, data);
    let capacity = cell.occupied_capacity()?.safe_add(margin)?;
    Ok(cell.with_capacity(capacity))
}

/// Appends a new object as a fixed output, returning its index.
pub(crate) fn add_object_output(
    skeleton: TransactionSkeleton,
    cell: Cell,
    entry: &ScriptEntry,
) -> Result<(TransactionSkeleton, usize)> {
    let skeleton = skeleton
        .add_output(cell)
        .add_cell_deps(entry.packed_cell_deps());
    let index = skeleton.outputs().len() - 1;
    Ok((skeleton.fix_output(index)?, index))
}

pub(crate) fn transfer_action(
    kind: ScriptKind,
    skeleton: &TransactionSkeleton,
    input_index: usize,
    output_index: usize,
) -> Result<Option<Action>> {
    let action = match kind {
        ScriptKind::Spore => transfer_spore_action(skeleton, input_index, output_index)?,
        ScriptKind::Cluster => transfer_cluster_action(skeleton, input_index, output_index)?,
        ScriptKind::ClusterProxy => {
            transfer_cluster_proxy_action(skeleton, input_index, output_index)?
        }
        ScriptKind::ClusterAgent => {
            transfer_cluster_agent_action(skeleton, input_index, output_index)?
        }
        ScriptKind::Mutant | ScriptKind::Lua => return Ok(None),
    };
    Ok(Some(action))
}

fn melt_action(
    kind: ScriptKind,
    skeleton: &TransactionSkeleton,
    input_index: usize,
) -> Result<Option<Action>> {
    let action = match kind {
        ScriptKind::Spore => melt_spore_action(skeleton, input_index)?,
        ScriptKind::ClusterProxy => melt_cluster_proxy_action(skeleton, input_index)?,
        ScriptKind::ClusterAgent => melt_cluster_agent_action(skeleton, input_index)?,
        ScriptKind::Cluster => {
            return Err(Error::invalid_reference("clusters cannot be melted"));
        }
        ScriptKind::Mutant | ScriptKind::Lua => return Ok(None),
    };
    Ok(Some(action))
}

fn seal(skeleton: TransactionSkeleton, actions: &[Action]) -> Result<TransactionSkeleton> {
    if actions.is_empty() {
        Ok(skeleton)
    } else {
        inject_cobuild_proof(skeleton, actions.to_vec())
    }
}

/// Seals `actions`, pays the fee from `funding` and checks the size budget.
pub(crate) fn seal_and_pay(
    ctx: &SporeContext,
    skeleton: TransactionSkeleton,
    funding: &Funding,
    actions: &[Action],
) -> Result<TransactionSkeleton> {
    let skeleton = seal(skeleton, actions)?;
    let skeleton = pay_fee_by_fee_rate(skeleton, funding, ctx.fee_rate()?)?;
    skeleton.ensure_size(ctx.max_transaction_size())?;
    Ok(skeleton)
}

fn pay_transfer_fee(
    ctx: &SporeContext,
    skeleton: TransactionSkeleton,
    output_index: usize,
    fee: FeeOptions,
) -> Result<TransactionSkeleton> {
    let fee_rate = ctx.fee_rate()?;
    if fee.use_capacity_margin {
        match pay_fee_by_output(skeleton.clone(), output_index, fee_rate) {
            Ok(skeleton) => return Ok(skeleton),
            Err(err) if fee.funding.is_none() => return Err(err),
            Err(err) => debug!("fall back to funding, capacity margin cannot pay: {err}"),
        }
    }
    match fee.funding {
        Some(funding) => pay_fee_by_fee_rate(skeleton, funding, fee_rate),
        None => Err(Error::invariant(
            "a transfer needs a capacity margin or funding to pay the fee",
        )),
    }
}

/// Consumes an object and recreates it guarded by `to`.
pub(crate) fn transfer_cell(
    ctx: &SporeContext,
    kind: ScriptKind,
    cell: Cell,
    entry: &ScriptEntry,
    to: Script,
    fee: FeeOptions,
    deps: Vec<CellDep>,
) -> Result<Assembly> {
    let output = cell.clone().with_lock(to).with_minimal_capacity()?;
    let options = SetupOptions {
        output: Some(output),
        fix_output: true,
        ..Default::default()
    };
    let skeleton = TransactionSkeleton::new()
        .setup_cell(cell, options)?
        .add_cell_deps(entry.packed_cell_deps())
        .add_cell_deps(deps);
    let (input_index, output_index) = (0, 0);
    let actions: Vec<Action> = if entry.behaviors.cobuild {
        transfer_action(kind, &skeleton, input_index, output_index)?
            .into_iter()
            .collect()
    } else {
        Vec::new()
    };
    let skeleton = seal(skeleton, &actions)?;
    let skeleton = pay_transfer_fee(ctx, skeleton, output_index, fee)?;
    skeleton.ensure_size(ctx.max_transaction_size())?;
    Ok(Assembly {
        skeleton,
        output_index,
        references: Vec::new(),
        actions,
    })
}

/// Consumes an object and redeems its whole capacity, minus the fee, to
/// `redeem_lock` or to the object's own lock.
pub(crate) fn melt_cell(
    ctx: &SporeContext,
    kind: ScriptKind,
    cell: Cell,
    entry: &ScriptEntry,
    redeem_lock: Option<Script>,
    deps: Vec<CellDep>,
) -> Result<Assembly> {
    let lock = redeem_lock.unwrap_or_else(|| cell.lock());
    let redeem = CellOutput::new_builder()
        .lock(lock)
        .capacity(cell.capacity().pack())
        .build();
    let skeleton = TransactionSkeleton::new()
        .add_input(cell, 0)?
        .add_cell_deps(entry.packed_cell_deps())
        .add_cell_deps(deps)
        .add_output(Cell::new(redeem, Bytes::new()));
    let output_index = 0;
    let skeleton = skeleton.set_change_output(Some(output_index))?;
    let actions: Vec<Action> = if entry.behaviors.cobuild {
        melt_action(kind, &skeleton, 0)?.into_iter().collect()
    } else {
        Vec::new()
    };
    let skeleton = seal(skeleton, &actions)?;
    let skeleton = pay_fee_by_output(skeleton, output_index, ctx.fee_rate()?)?;
    skeleton.ensure_size(ctx.max_transaction_size())?;
    Ok(Assembly {
        skeleton,
        output_index,
        references: Vec::new(),
        actions,
    })
}
