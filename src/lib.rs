//! Transaction assembly for the Spore protocol.
//!
//! Every operation starts from an empty [`TransactionSkeleton`], threads it
//! through injection, reference resolution, capacity balancing, type id
//! derivation and cobuild sealing, and returns the finished [`Assembly`].
//! Nothing is signed or submitted here; [`wait_for_transaction`] is provided
//! for callers that submit through a [`TransactionSender`].
//!
//! [`TransactionSkeleton`]: ckb_spore_skeleton::TransactionSkeleton
//! [`TransactionSender`]: ckb_spore_traits::TransactionSender

mod assembly;
mod cluster;
mod cluster_agent;
mod cluster_proxy;
mod context;
mod mutant;
mod object;
mod payment;
mod reference;
mod spore;
#[cfg(test)]
mod tests;
mod wait;

pub use crate::assembly::{Assembly, Reference, Resolution};
pub use crate::cluster::{CLUSTER_V1_TAG, CreateClusterParams, create_cluster, transfer_cluster};
pub use crate::cluster_agent::{
    CreateClusterAgentParams, ProxyReference, create_cluster_agent, melt_cluster_agent,
    transfer_cluster_agent,
};
pub use crate::cluster_proxy::{
    CreateClusterProxyParams, create_cluster_proxy, melt_cluster_proxy, transfer_cluster_proxy,
};
pub use crate::context::SporeContext;
pub use crate::mutant::{CreateMutantParams, create_mutant, melt_mutant, transfer_mutant};
pub use crate::object::{DEFAULT_CAPACITY_MARGIN, FeeOptions};
pub use crate::payment::Payments;
pub use crate::reference::{ReferenceStrategy, choose_strategy, required_payment};
pub use crate::spore::{ClusterMode, CreateSporeParams, create_spore, melt_spore, transfer_spore};
pub use crate::wait::{WaitOptions, send_and_wait, wait_for_transaction};

pub use ckb_spore_config::{ScriptKind, SporeConfig};
pub use ckb_spore_error::{Error, ErrorKind, Result};
pub use ckb_spore_skeleton::{FeeRate, Funding, TransactionSkeleton};
