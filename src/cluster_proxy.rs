//! Cluster proxies hand out the right to mint into a cluster. Holders of a
//! proxy create cluster agents, either owning the proxy or paying its owner
//! the minimal payment recorded in the proxy args.

use ckb_logger::info;
use ckb_spore_cobuild::create_cluster_proxy_action;
use ckb_spore_codec::{DelegationArgs, DelegationArgsVersion};
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
    object::{
        DEFAULT_CAPACITY_MARGIN, FeeOptions, add_object_output, melt_cell, new_object_cell,
        seal_and_pay, transfer_cell,
    },
    reference::resolve_reference,
};

#[derive(Clone, Debug)]
pub struct CreateClusterProxyParams {
    pub cluster_id: [u8; 32],
    pub to_lock: Script,
    /// Exponent of the payment, `10^n` shannons, accepted from agent
    /// creators not owning the proxy.
    pub min_payment: Option<u64>,
    pub capacity_margin: Capacity,
}

impl CreateClusterProxyParams {
    pub fn new(cluster_id: [u8; 32], to_lock: Script) -> Self {
        CreateClusterProxyParams {
            cluster_id,
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

pub fn create_cluster_proxy(
    ctx: &SporeContext,
    funding: &Funding,
    params: CreateClusterProxyParams,
) -> Result<Assembly> {
    let entry = ctx.config.latest(ScriptKind::ClusterProxy)?;
    let args = DelegationArgs::new(TYPE_ID_PLACEHOLDER, params.min_payment);
    let cell = new_object_cell(
        entry,
        args.pack_versioned(DelegationArgsVersion::V1)?,
        params.to_lock,
        Bytes::copy_from_slice(&params.cluster_id),
        params.capacity_margin,
    )?;
    let (skeleton, output_index) = add_object_output(TransactionSkeleton::new(), cell, entry)?;

    let (cluster, cluster_entry) = ctx.find_object(ScriptKind::Cluster, &params.cluster_id)?;
    let (skeleton, reference, reference_action) = resolve_reference(
        ctx,
        skeleton,
        funding,
        ScriptKind::Cluster,
        cluster,
        cluster_entry,
    )?;

    let skeleton = inject_needed_capacity(skeleton, funding)?;
    let skeleton = skeleton.write_type_id(output_index, |id| {
        Ok(args.with_id(id).pack_versioned(DelegationArgsVersion::V1)?)
    })?;
    let mut actions = Vec::new();
    if entry.behaviors.cobuild {
        actions.push(create_cluster_proxy_action(&skeleton, output_index)?);
    }
    actions.extend(reference_action);
    let skeleton = seal_and_pay(ctx, skeleton, funding, &actions)?;
    info!("created cluster proxy at output {}", output_index);
    Ok(Assembly {
        skeleton,
        output_index,
        references: vec![reference],
        actions,
    })
}

pub fn transfer_cluster_proxy(
    ctx: &SporeContext,
    out_point: &OutPoint,
    to: Script,
    fee: FeeOptions,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::ClusterProxy, out_point)?;
    transfer_cell(ctx, ScriptKind::ClusterProxy, cell, entry, to, fee, Vec::new())
}

pub fn melt_cluster_proxy(
    ctx: &SporeContext,
    out_point: &OutPoint,
    redeem_lock: Option<Script>,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::ClusterProxy, out_point)?;
    melt_cell(ctx, ScriptKind::ClusterProxy, cell, entry, redeem_lock, Vec::new())
}
