//! Cobuild envelope records.
//!
//! ```text
//! table Action { script_info_hash: Byte32, script_hash: Byte32, data: Bytes }
//! table Message { actions: ActionVec }
//! table ScriptInfo {
//!     name: String, url: String, script_hash: Byte32, schema: String, message_type: String,
//! }
//! table ResolvedInputs { outputs: CellOutputVec, outputs_data: BytesVec }
//! table BuildingPacketV1 {
//!     message: Message, payload: Transaction, resolved_inputs: ResolvedInputs,
//!     change_output: Uint32Opt, script_infos: ScriptInfoVec, lock_actions: ActionVec,
//! }
//! union BuildingPacket { BuildingPacketV1 }
//! table SighashAll { message: Message, seal: Bytes }
//! table SighashAllOnly { seal: Bytes }
//! union WitnessLayout {
//!     SighashAll: 4278190081, SighashAllOnly: 4278190082, Otx: 4278190083, OtxStart: 4278190084,
//! }
//! ```

use ckb_types::{bytes::Bytes, packed, prelude::*};

use crate::{
    Codec, CodecError, CodecResult,
    layout::{pack_table, pack_union, read_number, unpack_table, unpack_union, verify},
};

/// Witnesses whose first four bytes reach this value are `WitnessLayout`s;
/// anything below is a legacy `WitnessArgs`, whose first four bytes are its
/// total size.
pub const WITNESS_LAYOUT_THRESHOLD: u32 = 0xFF00_0000;
pub const SIGHASH_ALL_ITEM_ID: u32 = 0xFF00_0001;
pub const SIGHASH_ALL_ONLY_ITEM_ID: u32 = 0xFF00_0002;
pub const OTX_ITEM_ID: u32 = 0xFF00_0003;
pub const OTX_START_ITEM_ID: u32 = 0xFF00_0004;

table_record! {
    /// Describes one effect of the transaction for the script `script_hash`,
    /// encoded with the schema identified by `script_info_hash`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Action {
        pub script_info_hash: [u8; 32],
        pub script_hash: [u8; 32],
        pub data: Bytes,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq, Default)]
    pub struct Message {
        pub actions: Vec<Action>,
    }
}

table_record! {
    /// Tells an auditor how to interpret the data of an [`Action`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ScriptInfo {
        pub name: String,
        pub url: String,
        pub script_hash: [u8; 32],
        pub schema: String,
        pub message_type: String,
    }
}

/// Pre-images of the cells consumed by the payload transaction.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ResolvedInputs {
    pub outputs: Vec<packed::CellOutput>,
    pub outputs_data: Vec<Bytes>,
}

impl Codec for ResolvedInputs {
    fn pack(&self) -> Bytes {
        let outputs = packed::CellOutputVec::new_builder()
            .extend(self.outputs.iter().cloned())
            .build();
        let outputs_data = packed::BytesVec::new_builder()
            .extend(self.outputs_data.iter().map(|data| data.pack()))
            .build();
        pack_table(&[outputs.as_slice(), outputs_data.as_slice()]).into()
    }

    fn unpack(slice: &[u8]) -> CodecResult<Self> {
        let fields = unpack_table(slice, 2, false)?;
        Ok(ResolvedInputs {
            outputs: verify::<packed::CellOutputVec>(fields[0])?
                .into_iter()
                .collect(),
            outputs_data: verify::<packed::BytesVec>(fields[1])?
                .into_iter()
                .map(|data| data.raw_data())
                .collect(),
        })
    }
}

impl_table_field!(ResolvedInputs);

table_record! {
    /// Everything a co-builder needs to continue or audit a transaction.
    #[derive(Clone, Debug)]
    pub struct BuildingPacketV1 {
        pub message: Message,
        pub payload: packed::Transaction,
        pub resolved_inputs: ResolvedInputs,
        pub change_output: Option<u32>,
        pub script_infos: Vec<ScriptInfo>,
        pub lock_actions: Vec<Action>,
    }
}

#[derive(Clone, Debug)]
pub enum BuildingPacket {
    V1(BuildingPacketV1),
}

impl BuildingPacket {
    const V1_ITEM_ID: u32 = 0;
}

impl Codec for BuildingPacket {
    fn pack(&self) -> Bytes {
        match self {
            BuildingPacket::V1(packet) => pack_union(Self::V1_ITEM_ID, &packet.pack()).into(),
        }
    }

    fn unpack(slice: &[u8]) -> CodecResult<Self> {
        match unpack_union(slice)? {
            (Self::V1_ITEM_ID, item) => BuildingPacketV1::unpack(item).map(BuildingPacket::V1),
            (item_id, _) => Err(CodecError::UnknownItem(item_id)),
        }
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq, Default)]
    pub struct SighashAll {
        pub message: Message,
        pub seal: Bytes,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq, Default)]
    pub struct SighashAllOnly {
        pub seal: Bytes,
    }
}

/// The structured witness envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WitnessLayout {
    SighashAll(SighashAll),
    SighashAllOnly(SighashAllOnly),
}

impl WitnessLayout {
    pub fn item_id(&self) -> u32 {
        match self {
            WitnessLayout::SighashAll(_) => SIGHASH_ALL_ITEM_ID,
            WitnessLayout::SighashAllOnly(_) => SIGHASH_ALL_ONLY_ITEM_ID,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            WitnessLayout::SighashAll(layout) => Some(&layout.message),
            WitnessLayout::SighashAllOnly(_) => None,
        }
    }
}

impl Codec for WitnessLayout {
    fn pack(&self) -> Bytes {
        let item = match self {
            WitnessLayout::SighashAll(layout) => layout.pack(),
            WitnessLayout::SighashAllOnly(layout) => layout.pack(),
        };
        pack_union(self.item_id(), &item).into()
    }

    fn unpack(slice: &[u8]) -> CodecResult<Self> {
        match unpack_union(slice)? {
            (SIGHASH_ALL_ITEM_ID, item) => SighashAll::unpack(item).map(WitnessLayout::SighashAll),
            (SIGHASH_ALL_ONLY_ITEM_ID, item) => {
                SighashAllOnly::unpack(item).map(WitnessLayout::SighashAllOnly)
            }
            (item_id, _) => Err(CodecError::UnknownItem(item_id)),
        }
    }
}

/// How a witness is to be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WitnessKind {
    /// Empty, or a legacy `WitnessArgs`.
    Legacy,
    /// A `WitnessLayout` with the given item id.
    Layout(u32),
}

pub fn classify_witness(witness: &[u8]) -> WitnessKind {
    match read_number(witness) {
        Ok(item_id) if item_id >= WITNESS_LAYOUT_THRESHOLD => WitnessKind::Layout(item_id),
        _ => WitnessKind::Legacy,
    }
}
