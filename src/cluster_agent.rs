//! Cluster agents let their holder mint spores into the cluster of the
//! proxy they were created from.

use ckb_logger::info;
use ckb_spore_cobuild::create_cluster_agent_action;
use ckb_spore_codec::{DelegationArgs, DelegationArgsVersion, layout::unpack_byte32};
use ckb_spore_config::ScriptKind;
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::{Funding, TransactionSkeleton, inject_needed_capacity};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{OutPoint, Script},
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
    reference::{required_payment, resolve_reference},
};

/// How the agent creator proves access to the proxy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProxyReference {
    /// Lock proxy when possible, otherwise consume and recreate the proxy.
    #[default]
    Auto,
    /// Pay the proxy owner, at least the minimal payment of the proxy.
    Payment(Capacity),
}

#[derive(Clone, Debug)]
pub struct CreateClusterAgentParams {
    pub proxy_out_point: OutPoint,
    pub to_lock: Script,
    pub reference: ProxyReference,
    pub capacity_margin: Capacity,
}

impl CreateClusterAgentParams {
    pub fn new(proxy_out_point: OutPoint, to_lock: Script) -> Self {
        CreateClusterAgentParams {
            proxy_out_point,
            to_lock,
            reference: ProxyReference::Auto,
            capacity_margin: DEFAULT_CAPACITY_MARGIN,
        }
    }

    pub fn with_payment(mut self, amount: Capacity) -> Self {
        self.reference = ProxyReference::Payment(amount);
        self
    }

    pub fn with_capacity_margin(mut self, margin: Capacity) -> Self {
        self.capacity_margin = margin;
        self
    }
}

/// Agent type args hold the type script hash of their proxy, and the agent
/// data the cluster id. Agents carry no type id.
pub fn create_cluster_agent(
    ctx: &SporeContext,
    funding: &Funding,
    params: CreateClusterAgentParams,
) -> Result<Assembly> {
    let entry = ctx.config.latest(ScriptKind::ClusterAgent)?;
    let (proxy, proxy_entry) = ctx.object_cell(ScriptKind::ClusterProxy, &params.proxy_out_point)?;
    let proxy_type = type_script_of(&proxy)?;
    let proxy_args = DelegationArgs::unpack_versioned(
        &proxy_type.args().raw_data(),
        DelegationArgsVersion::V1,
    )?;
    let cluster_id = unpack_byte32(&proxy.data)?;
    let cell = new_object_cell(
        entry,
        proxy_type.calc_script_hash().as_bytes(),
        params.to_lock,
        Bytes::copy_from_slice(&cluster_id),
        params.capacity_margin,
    )?;
    let (skeleton, output_index) = add_object_output(TransactionSkeleton::new(), cell, entry)?;

    let (skeleton, reference, reference_action) = match params.reference {
        ProxyReference::Auto => resolve_reference(
            ctx,
            skeleton,
            funding,
            ScriptKind::ClusterProxy,
            proxy,
            proxy_entry,
        )?,
        ProxyReference::Payment(amount) => {
            let exponent = proxy_args.min_payment.ok_or_else(|| {
                Error::invalid_reference(format!(
                    "cluster proxy {} accepts no payment",
                    params.proxy_out_point
                ))
            })?;
            let lock = proxy.lock();
            let required = required_payment(exponent, &lock)?;
            if amount < required {
                return Err(Error::InsufficientPayment {
                    required: required.as_u64(),
                    provided: amount.as_u64(),
                });
            }
            let mut payments = Payments::new();
            payments.require(lock, amount);
            let (skeleton, outputs) = payments.inject(skeleton)?;
            let skeleton = skeleton
                .add_cell_dep(object_dep(&proxy)?)
                .add_cell_deps(proxy_entry.packed_cell_deps());
            let output_index = outputs
                .first()
                .map(|(_, index)| *index)
                .ok_or_else(|| Error::invariant("payment output is missing"))?;
            let reference = Reference {
                kind: ScriptKind::ClusterProxy,
                id: proxy_args.id,
                out_point: params.proxy_out_point.clone(),
                resolution: Resolution::Payment {
                    output_index,
                    amount,
                },
            };
            (skeleton, reference, None)
        }
    };

    let skeleton = inject_needed_capacity(skeleton, funding)?;
    let mut actions = Vec::new();
    if entry.behaviors.cobuild {
        actions.push(create_cluster_agent_action(
            &skeleton,
            output_index,
            proxy_args.id,
        )?);
    }
    actions.extend(reference_action);
    let skeleton = seal_and_pay(ctx, skeleton, funding, &actions)?;
    info!("created cluster agent at output {}", output_index);
    Ok(Assembly {
        skeleton,
        output_index,
        references: vec![reference],
        actions,
    })
}

pub fn transfer_cluster_agent(
    ctx: &SporeContext,
    out_point: &OutPoint,
    to: Script,
    fee: FeeOptions,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::ClusterAgent, out_point)?;
    transfer_cell(ctx, ScriptKind::ClusterAgent, cell, entry, to, fee, Vec::new())
}

pub fn melt_cluster_agent(
    ctx: &SporeContext,
    out_point: &OutPoint,
    redeem_lock: Option<Script>,
) -> Result<Assembly> {
    let (cell, entry) = ctx.object_cell(ScriptKind::ClusterAgent, out_point)?;
    melt_cell(ctx, ScriptKind::ClusterAgent, cell, entry, redeem_lock, Vec::new())
}
