//! Mutants: cells carrying extension code that spores opt into through the
//! `mutant[]` content type parameter. A mutant owner may require a minimal
//! payment from every spore created with it.

use ckb_logger::info;
use ckb_spore_codec::{DelegationArgs, DelegationArgsVersion};
use ckb_spore_config::ScriptKind;
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::{Funding, TYPE_ID_PLACEHOLDER, TransactionSkeleton, inject_needed_capacity};
use ckb_spore_traits::Cell;
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellDep, OutPoint, Script},
    prelude::*,
};

use crate::{
    Assembly, Reference, Resolution,
    context::{SporeContext, object_dep, type_script_of},
    object::{
        DEFAULT_CAPACITY_MARGIN, FeeOptions, add_object_output, melt_cell, new_object_cell,
        seal_and_pay, transfer_cell,
    },
    payment::Payments,
    reference::required_payment,
};

#[derive(Clone, Debug)]
pub struct CreateMutantParams {
    pub code: Bytes,
    pub to_lock: Script,
    /// Exponent of the minimal payment, `10^n` shannons.
    pub min_payment: Option<u64>,
    pub capacity_margin: Capacity,
}

impl CreateMutantParams {
    pub fn new(code: Bytes, to_lock: Script) -> Self {
        CreateMutantParams {
            code,
            to_lock,
            min_payment: None,
            capacity_margin: DEFAULT_CAPACITY_MARGIN,
        }
    }

    pub fn with_min_payment(mut self, exponent: u64) -> Self {
        self.min_payment = Some(exponent);
        self
    }

    pub fn with_capacity_margin(mut self, margin: Capacity) -> Self {
        self.capacity_margin = margin;
        self
    }
}

pub fn create_mutant(
    ctx: &SporeContext,
    funding: &Funding,
    params: CreateMutantParams,
) -> Result<Assembly> {
    let entry = ctx.config.latest(ScriptKind::Mutant)?;
    let args = DelegationArgs::new(TYPE_ID_PLACEHOLDER, params.min_payment);
    let cell = new_object_cell(
        entry,
        args.pack_versioned(DelegationArgsVersion::V2)?,
        params.to_lock,
        params.code,
        params.capacity_margin,
    )?;
    let (skeleton, output_index) = add_object_output(TransactionSkeleton::new(), cell, entry)?;
    let skeleton = inject_needed_capacity(skeleton, funding)?;
    let skeleton = skeleton.write_type_id(output_index, |id| {
        Ok(args.with_id(id).pack_versioned(DelegationArgsVersion::V2)?)
    })?;
    let skeleton = seal_and_pay(ctx, skeleton, funding, &[])?;
    info!("created mutant at output {}", output_index);
    Ok(Assembly {
        skeleton,
        output_index,
        references: Vec::new(),
        actions: Vec::new(),
    })
}

pub fn transfer_mutant(
    ctx: &SporeContext,
    out_point: &OutPoint,
    to: Script,
    fee: FeeOptions,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::Mutant, out_point)?;
    transfer_cell(ctx, ScriptKind::Mutant, cell, entry, to, fee, Vec::new())
}

pub fn melt_mutant(
    ctx: &SporeContext,
    out_point: &OutPoint,
    redeem_lock: Option<Script>,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::Mutant, out_point)?;
    melt_cell(ctx, ScriptKind::Mutant, cell, entry, redeem_lock, Vec::new())
}

/// Deps of the lua runtime mutants execute on, when one is configured.
fn lua_deps(ctx: &SporeContext) -> Vec<CellDep> {
    ctx.config
        .latest(ScriptKind::Lua)
        .map(|entry| entry.packed_cell_deps())
        .unwrap_or_default()
}

struct LoadedMutant {
    id: [u8; 32],
    cell: Cell,
    args: DelegationArgs,
    deps: Vec<CellDep>,
}

fn load_mutant(ctx: &SporeContext, id: &[u8; 32]) -> Result<LoadedMutant> {
    let (cell, entry) = ctx.find_object(ScriptKind::Mutant, id)?;
    let args = DelegationArgs::unpack_versioned(
        &type_script_of(&cell)?.args().raw_data(),
        DelegationArgsVersion::V2,
    )?;
    let mut deps = vec![object_dep(&cell)?];
    deps.extend(entry.packed_cell_deps());
    Ok(LoadedMutant {
        id: *id,
        cell,
        args,
        deps,
    })
}

fn out_point_of(cell: &Cell) -> Result<OutPoint> {
    cell.out_point
        .clone()
        .ok_or_else(|| Error::invariant("a referenced mutant must be live"))
}

/// Cell deps running the mutants `ids`, without any payment.
pub(crate) fn mutant_deps(
    ctx: &SporeContext,
    ids: &[[u8; 32]],
) -> Result<(Vec<CellDep>, Vec<Reference>)> {
    let mut deps = Vec::new();
    let mut references = Vec::with_capacity(ids.len());
    for id in ids {
        let mutant = load_mutant(ctx, id)?;
        references.push(Reference {
            kind: ScriptKind::Mutant,
            id: mutant.id,
            out_point: out_point_of(&mutant.cell)?,
            resolution: Resolution::CellDep,
        });
        deps.extend(mutant.deps);
    }
    if !ids.is_empty() {
        deps.extend(lua_deps(ctx));
    }
    Ok((deps, references))
}

/// Adds the mutants `ids` as cell deps and pays the owners requiring a
/// minimal payment.
pub(crate) fn reference_mutants(
    ctx: &SporeContext,
    skeleton: TransactionSkeleton,
    ids: &[[u8; 32]],
) -> Result<(TransactionSkeleton, Vec<Reference>)> {
    let mutants = ids
        .iter()
        .map(|id| load_mutant(ctx, id))
        .collect::<Result<Vec<_>>>()?;
    let mut skeleton = skeleton;
    let mut payments = Payments::new();
    for mutant in &mutants {
        skeleton = skeleton.add_cell_deps(mutant.deps.iter().cloned());
        if let Some(exponent) = mutant.args.min_payment {
            let lock = mutant.cell.lock();
            let amount = required_payment(exponent, &lock)?;
            payments.require(lock, amount);
        }
    }
    if !mutants.is_empty() {
        skeleton = skeleton.add_cell_deps(lua_deps(ctx));
    }
    let (skeleton, payment_outputs) = payments.inject(skeleton)?;

    let mut references = Vec::with_capacity(mutants.len());
    for mutant in mutants {
        let lock = mutant.cell.lock();
        let resolution = match (mutant.args.min_payment, payments.amount(&lock)) {
            (Some(_), Some(amount)) => {
                let output_index = payment_outputs
                    .iter()
                    .find(|(owner, _)| owner == &lock)
                    .map(|(_, index)| *index)
                    .ok_or_else(|| Error::invariant("payment output is missing"))?;
                Resolution::Payment {
                    output_index,
                    amount,
                }
            }
            _ => Resolution::CellDep,
        };
        references.push(Reference {
            kind: ScriptKind::Mutant,
            id: mutant.id,
            out_point: out_point_of(&mutant.cell)?,
            resolution,
        });
    }
    Ok((skeleton, references))
}
