//! Clusters group spores. A cluster is never melted.

use ckb_logger::info;
use ckb_spore_cobuild::create_cluster_action;
use ckb_spore_codec::{ClusterData, ClusterDataVersion};
use ckb_spore_config::ScriptKind;
use ckb_spore_error::Result;
use ckb_spore_skeleton::{Funding, TYPE_ID_PLACEHOLDER, TransactionSkeleton, inject_needed_capacity};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{OutPoint, Script},
};

use crate::{
    Assembly,
    context::SporeContext,
    mutant::mutant_deps,
    object::{
        DEFAULT_CAPACITY_MARGIN, FeeOptions, add_object_output, new_object_cell, seal_and_pay,
        transfer_cell,
    },
};

/// Deployments carrying this tag only accept the first cluster data layout.
pub const CLUSTER_V1_TAG: &str = "v1";

#[derive(Clone, Debug)]
pub struct CreateClusterParams {
    pub data: ClusterData,
    pub to_lock: Script,
    pub capacity_margin: Capacity,
}

impl CreateClusterParams {
    pub fn new(data: ClusterData, to_lock: Script) -> Self {
        CreateClusterParams {
            data,
            to_lock,
            capacity_margin: DEFAULT_CAPACITY_MARGIN,
        }
    }

    pub fn with_capacity_margin(mut self, margin: Capacity) -> Self {
        self.capacity_margin = margin;
        self
    }
}

pub fn create_cluster(
    ctx: &SporeContext,
    funding: &Funding,
    params: CreateClusterParams,
) -> Result<Assembly> {
    let entry = ctx.config.latest(ScriptKind::Cluster)?;
    let version = if entry.has_tag(CLUSTER_V1_TAG) {
        ClusterDataVersion::V1
    } else {
        ClusterDataVersion::V2
    };
    let data = params.data.into_version(version)?;
    let cell = new_object_cell(
        entry,
        Bytes::copy_from_slice(&TYPE_ID_PLACEHOLDER),
        params.to_lock,
        data.pack(),
        params.capacity_margin,
    )?;
    let (skeleton, output_index) = add_object_output(TransactionSkeleton::new(), cell, entry)?;
    let mutant_ids: Vec<[u8; 32]> = data.mutant_id().into_iter().collect();
    let (deps, references) = mutant_deps(ctx, &mutant_ids)?;
    let skeleton = skeleton.add_cell_deps(deps);

    let skeleton = inject_needed_capacity(skeleton, funding)?;
    let skeleton =
        skeleton.write_type_id(output_index, |id| Ok(Bytes::copy_from_slice(&id)))?;
    let actions = if entry.behaviors.cobuild {
        vec![create_cluster_action(&skeleton, output_index)?]
    } else {
        Vec::new()
    };
    let skeleton = seal_and_pay(ctx, skeleton, funding, &actions)?;
    info!("created cluster at output {}", output_index);
    Ok(Assembly {
        skeleton,
        output_index,
        references,
        actions,
    })
}

pub fn transfer_cluster(
    ctx: &SporeContext,
    out_point: &OutPoint,
    to: Script,
    fee: FeeOptions,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::Cluster, out_point)?;
    let assembly = transfer_cell(ctx, ScriptKind::Cluster, cell, entry, to, fee, Vec::new())?;
    info!("transferred cluster {}", out_point);
    Ok(assembly)
}
