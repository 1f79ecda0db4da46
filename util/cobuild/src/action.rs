//! Builders of spore actions from the final skeleton.
//!
//! Ids are read back from the cells, so builders must run after type ids
//! have been written.

use ckb_hash::blake2b_256;
use ckb_spore_codec::{
    Action, Address, Codec, CreateCluster, CreateClusterAgent, CreateClusterProxy, CreateSpore,
    MeltClusterAgent, MeltClusterProxy, MeltSpore, SporeAction, TransferCluster,
    TransferClusterAgent, TransferClusterProxy, TransferSpore, layout::unpack_byte32,
};
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::TransactionSkeleton;
use ckb_spore_traits::Cell;
use ckb_types::{packed::Script, prelude::*};

use crate::{script_info_hash, spore_script_info};

fn type_script(cell: &Cell) -> Result<Script> {
    cell.type_()
        .ok_or_else(|| Error::invariant("an object cell must carry a type script"))
}

fn script_hash(cell: &Cell) -> Result<[u8; 32]> {
    Ok(type_script(cell)?.calc_script_hash().unpack())
}

/// The type id leading the type script args.
fn object_id(cell: &Cell) -> Result<[u8; 32]> {
    let args = type_script(cell)?.args().raw_data();
    if args.len() < 32 {
        return Err(Error::invariant("type script args are shorter than an id"));
    }
    Ok(unpack_byte32(&args[..32])?)
}

/// The cluster id stored as the cell data of proxies and agents.
fn data_id(cell: &Cell) -> Result<[u8; 32]> {
    Ok(unpack_byte32(&cell.data)?)
}

fn address(cell: &Cell) -> Address {
    Address::from(cell.lock())
}

fn input(skeleton: &TransactionSkeleton, index: usize) -> Result<&Cell> {
    skeleton
        .inputs()
        .get(index)
        .ok_or_else(|| Error::invariant(format!("input {index} does not exist")))
}

fn action(governing: &Cell, data: SporeAction) -> Result<Action> {
    let script_hash = script_hash(governing)?;
    Ok(Action {
        script_info_hash: script_info_hash(&spore_script_info(script_hash)),
        script_hash,
        data: data.pack(),
    })
}

/// Decodes the data of a spore action.
pub fn unpack_spore_action(action: &Action) -> Result<SporeAction> {
    Ok(SporeAction::unpack(&action.data)?)
}

pub fn create_spore_action(skeleton: &TransactionSkeleton, output_index: usize) -> Result<Action> {
    let output = skeleton.output(output_index)?;
    let data = CreateSpore {
        spore_id: object_id(output)?,
        to: address(output),
        data_hash: blake2b_256(&output.data),
    };
    action(output, data.into())
}

pub fn transfer_spore_action(
    skeleton: &TransactionSkeleton,
    input_index: usize,
    output_index: usize,
) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let output = skeleton.output(output_index)?;
    let data = TransferSpore {
        spore_id: object_id(input)?,
        from: address(input),
        to: address(output),
    };
    action(output, data.into())
}

pub fn melt_spore_action(skeleton: &TransactionSkeleton, input_index: usize) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let data = MeltSpore {
        spore_id: object_id(input)?,
        from: address(input),
    };
    action(input, data.into())
}

pub fn create_cluster_action(
    skeleton: &TransactionSkeleton,
    output_index: usize,
) -> Result<Action> {
    let output = skeleton.output(output_index)?;
    let data = CreateCluster {
        cluster_id: object_id(output)?,
        to: address(output),
        data_hash: blake2b_256(&output.data),
    };
    action(output, data.into())
}

pub fn transfer_cluster_action(
    skeleton: &TransactionSkeleton,
    input_index: usize,
    output_index: usize,
) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let output = skeleton.output(output_index)?;
    let data = TransferCluster {
        cluster_id: object_id(input)?,
        from: address(input),
        to: address(output),
    };
    action(output, data.into())
}

pub fn create_cluster_proxy_action(
    skeleton: &TransactionSkeleton,
    output_index: usize,
) -> Result<Action> {
    let output = skeleton.output(output_index)?;
    let data = CreateClusterProxy {
        cluster_id: data_id(output)?,
        cluster_proxy_id: object_id(output)?,
        to: address(output),
    };
    action(output, data.into())
}

pub fn transfer_cluster_proxy_action(
    skeleton: &TransactionSkeleton,
    input_index: usize,
    output_index: usize,
) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let output = skeleton.output(output_index)?;
    let data = TransferClusterProxy {
        cluster_id: data_id(input)?,
        cluster_proxy_id: object_id(input)?,
        from: address(input),
        to: address(output),
    };
    action(output, data.into())
}

pub fn melt_cluster_proxy_action(
    skeleton: &TransactionSkeleton,
    input_index: usize,
) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let data = MeltClusterProxy {
        cluster_id: data_id(input)?,
        cluster_proxy_id: object_id(input)?,
        from: address(input),
    };
    action(input, data.into())
}

/// Agent args only hold the type script hash of the proxy, so the proxy id
/// is passed in.
pub fn create_cluster_agent_action(
    skeleton: &TransactionSkeleton,
    output_index: usize,
    cluster_proxy_id: [u8; 32],
) -> Result<Action> {
    let output = skeleton.output(output_index)?;
    let data = CreateClusterAgent {
        cluster_id: data_id(output)?,
        cluster_proxy_id,
        to: address(output),
    };
    action(output, data.into())
}

pub fn transfer_cluster_agent_action(
    skeleton: &TransactionSkeleton,
    input_index: usize,
    output_index: usize,
) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let output = skeleton.output(output_index)?;
    let data = TransferClusterAgent {
        cluster_id: data_id(input)?,
        from: address(input),
        to: address(output),
    };
    action(output, data.into())
}

pub fn melt_cluster_agent_action(
    skeleton: &TransactionSkeleton,
    input_index: usize,
) -> Result<Action> {
    let input = input(skeleton, input_index)?;
    let data = MeltClusterAgent {
        cluster_id: data_id(input)?,
        from: address(input),
    };
    action(input, data.into())
}
