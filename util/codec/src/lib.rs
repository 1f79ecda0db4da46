//! Molecule codec of the spore protocol.
//!
//! The on-chain scripts read these payloads byte for byte, so every record
//! here mirrors the molecule schema quoted in its documentation. Unpacking
//! verifies the full layout before touching any field and reports
//! [`CodecError`] instead of reading out of bounds.

#[macro_use]
mod macros;

mod action;
mod cluster;
mod cobuild;
mod delegation;
mod field;
pub mod layout;
mod spore;
#[cfg(test)]
mod tests;

use ckb_types::bytes::Bytes;

pub use action::{
    Address, CreateCluster, CreateClusterAgent, CreateClusterProxy, CreateSpore,
    MeltClusterAgent, MeltClusterProxy, MeltSpore, SporeAction, TransferCluster,
    TransferClusterAgent, TransferClusterProxy, TransferSpore,
};
pub use ckb_spore_error::CodecError;
pub use cluster::{ClusterData, ClusterDataV1, ClusterDataV2, ClusterDataVersion};
pub use cobuild::{
    Action, BuildingPacket, BuildingPacketV1, Message, OTX_ITEM_ID, OTX_START_ITEM_ID,
    ResolvedInputs, SIGHASH_ALL_ITEM_ID, SIGHASH_ALL_ONLY_ITEM_ID, ScriptInfo, SighashAll,
    SighashAllOnly, WITNESS_LAYOUT_THRESHOLD, WitnessKind, WitnessLayout, classify_witness,
};
pub use delegation::{DelegationArgs, DelegationArgsVersion};
pub use layout::CodecResult;
pub use spore::SporeData;

/// A record with a fixed molecule layout.
pub trait Codec: Sized {
    /// Serializes the record.
    fn pack(&self) -> Bytes;

    /// Verifies `slice` against the layout and deserializes it.
    fn unpack(slice: &[u8]) -> CodecResult<Self>;
}
