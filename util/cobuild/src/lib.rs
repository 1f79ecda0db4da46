//! Cobuild support of spore transactions.
//!
//! Each mutation of a spore object is described by an [`Action`] whose data
//! is a packed [`SporeAction`]. The actions are sealed into a trailing
//! `SighashAll` witness so an auditor can tell what a transaction does
//! without diffing its cells.
//!
//! [`Action`]: ckb_spore_codec::Action
//! [`SporeAction`]: ckb_spore_codec::SporeAction

mod action;
mod script_info;
#[cfg(test)]
mod tests;
mod witness;

pub use crate::action::{
    create_cluster_action, create_cluster_agent_action, create_cluster_proxy_action,
    create_spore_action, melt_cluster_agent_action, melt_cluster_proxy_action,
    melt_spore_action, transfer_cluster_action, transfer_cluster_agent_action,
    transfer_cluster_proxy_action, transfer_spore_action, unpack_spore_action,
};
pub use crate::script_info::{SPORE_ACTION_SCHEMA, script_info_hash, spore_script_info};
pub use crate::witness::{
    assemble_building_packet, find_cobuild_message, inject_cobuild_proof,
};
