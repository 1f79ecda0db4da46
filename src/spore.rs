//! Spores: the on-chain digital objects of the protocol.

use ckb_logger::info;
use ckb_spore_cobuild::create_spore_action;
use ckb_spore_codec::{ClusterData, Codec, SporeData};
use ckb_spore_config::ScriptKind;
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::{Funding, TYPE_ID_PLACEHOLDER, TransactionSkeleton, inject_needed_capacity};
use ckb_spore_traits::Cell;
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellDep, OutPoint, Script},
};

use crate::{
    Assembly,
    context::{SporeContext, object_dep},
    mutant::{mutant_deps, reference_mutants},
    object::{
        DEFAULT_CAPACITY_MARGIN, FeeOptions, add_object_output, melt_cell, new_object_cell,
        seal_and_pay, transfer_cell,
    },
    reference::resolve_reference,
};

/// How a spore joining a cluster proves the cluster's consent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClusterMode {
    /// Reference the cluster cell itself.
    #[default]
    ClusterCell,
    /// Reference the cluster agent at the out point.
    ClusterAgent(OutPoint),
}

#[derive(Clone, Debug)]
pub struct CreateSporeParams {
    pub data: SporeData,
    pub to_lock: Script,
    pub capacity_margin: Capacity,
    /// Ignored unless `data.cluster_id` is set.
    pub cluster_mode: ClusterMode,
}

impl CreateSporeParams {
    pub fn new(data: SporeData, to_lock: Script) -> Self {
        CreateSporeParams {
            data,
            to_lock,
            capacity_margin: DEFAULT_CAPACITY_MARGIN,
            cluster_mode: ClusterMode::ClusterCell,
        }
    }

    pub fn with_capacity_margin(mut self, margin: Capacity) -> Self {
        self.capacity_margin = margin;
        self
    }

    pub fn with_cluster_agent(mut self, out_point: OutPoint) -> Self {
        self.cluster_mode = ClusterMode::ClusterAgent(out_point);
        self
    }
}

pub fn create_spore(
    ctx: &SporeContext,
    funding: &Funding,
    params: CreateSporeParams,
) -> Result<Assembly> {
    let entry = ctx.config.latest(ScriptKind::Spore)?;
    let mut mutant_ids = ctx
        .decode_content_type(&params.data.content_type)?
        .mutant_ids()?;
    let cell = new_object_cell(
        entry,
        Bytes::copy_from_slice(&TYPE_ID_PLACEHOLDER),
        params.to_lock,
        params.data.pack(),
        params.capacity_margin,
    )?;
    let (mut skeleton, output_index) =
        add_object_output(TransactionSkeleton::new(), cell, entry)?;
    let mut references = Vec::new();
    let mut actions = Vec::new();

    if let Some(cluster_id) = params.data.cluster_id {
        let (cluster, cluster_entry) = ctx.find_object(ScriptKind::Cluster, &cluster_id)?;
        let cluster_data = ClusterData::unpack_versioned(&cluster.data, None)?;
        if let Some(mutant_id) = cluster_data.mutant_id() {
            if !mutant_ids.contains(&mutant_id) {
                mutant_ids.push(mutant_id);
            }
        }
        let (kind, target, target_entry) = match &params.cluster_mode {
            ClusterMode::ClusterCell => (ScriptKind::Cluster, cluster, cluster_entry),
            ClusterMode::ClusterAgent(out_point) => {
                let (agent, agent_entry) = ctx.object_cell(ScriptKind::ClusterAgent, out_point)?;
                if agent.data.as_ref() != cluster_id.as_slice() {
                    return Err(Error::invalid_reference(format!(
                        "cluster agent {out_point} does not serve cluster {}",
                        faster_hex::hex_string(&cluster_id)
                    )));
                }
                skeleton = skeleton
                    .add_cell_dep(object_dep(&cluster)?)
                    .add_cell_deps(cluster_entry.packed_cell_deps());
                (ScriptKind::ClusterAgent, agent, agent_entry)
            }
        };
        let (next, reference, action) =
            resolve_reference(ctx, skeleton, funding, kind, target, target_entry)?;
        skeleton = next;
        references.push(reference);
        actions.extend(action);
    }

    let (skeleton, mutant_references) = reference_mutants(ctx, skeleton, &mutant_ids)?;
    references.extend(mutant_references);

    let skeleton = inject_needed_capacity(skeleton, funding)?;
    let skeleton =
        skeleton.write_type_id(output_index, |id| Ok(Bytes::copy_from_slice(&id)))?;
    if entry.behaviors.cobuild {
        actions.insert(0, create_spore_action(&skeleton, output_index)?);
    }
    let skeleton = seal_and_pay(ctx, skeleton, funding, &actions)?;
    info!("created spore at output {}", output_index);
    Ok(Assembly {
        skeleton,
        output_index,
        references,
        actions,
    })
}

/// Deps of the mutants a spore runs.
fn spore_deps(ctx: &SporeContext, cell: &Cell) -> Result<Vec<CellDep>> {
    let data = SporeData::unpack(&cell.data)?;
    let mutant_ids = ctx.decode_content_type(&data.content_type)?.mutant_ids()?;
    let (deps, _) = mutant_deps(ctx, &mutant_ids)?;
    Ok(deps)
}

pub fn transfer_spore(
    ctx: &SporeContext,
    out_point: &OutPoint,
    to: Script,
    fee: FeeOptions,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::Spore, out_point)?;
    let deps = spore_deps(ctx, &cell)?;
    let assembly = transfer_cell(ctx, ScriptKind::Spore, cell, entry, to, fee, deps)?;
    info!("transferred spore {}", out_point);
    Ok(assembly)
}

pub fn melt_spore(
    ctx: &SporeContext,
    out_point: &OutPoint,
    redeem_lock: Option<Script>,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::Spore, out_point)?;
    let deps = spore_deps(ctx, &cell)?;
    let assembly = melt_cell(ctx, ScriptKind::Spore, cell, entry, redeem_lock, deps)?;
    info!("melted spore {}", out_point);
    Ok(assembly)
}
