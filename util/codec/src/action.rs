//! Spore action records carried in cobuild messages.
//!
//! ```text
//! union Address { Script }
//!
//! union SporeActionData {
//!     CreateSpore, TransferSpore, MeltSpore,
//!     CreateCluster, TransferCluster,
//!     CreateClusterProxy, TransferClusterProxy, MeltClusterProxy,
//!     CreateClusterAgent, TransferClusterAgent, MeltClusterAgent,
//! }
//! ```

use ckb_types::{bytes::Bytes, packed, prelude::*};

use crate::{
    Codec, CodecError, CodecResult,
    layout::{pack_union, unpack_union, verify},
};

/// A lock script wrapped in the single-item `Address` union.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(pub packed::Script);

impl Address {
    const SCRIPT_ITEM_ID: u32 = 0;

    pub fn script(&self) -> &packed::Script {
        &self.0
    }
}

impl From<packed::Script> for Address {
    fn from(script: packed::Script) -> Self {
        Address(script)
    }
}

impl Codec for Address {
    fn pack(&self) -> Bytes {
        pack_union(Self::SCRIPT_ITEM_ID, self.0.as_slice()).into()
    }

    fn unpack(slice: &[u8]) -> CodecResult<Self> {
        match unpack_union(slice)? {
            (Self::SCRIPT_ITEM_ID, item) => verify::<packed::Script>(item).map(Address),
            (item_id, _) => Err(CodecError::UnknownItem(item_id)),
        }
    }
}

impl_table_field!(Address);

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CreateSpore {
        pub spore_id: [u8; 32],
        pub to: Address,
        pub data_hash: [u8; 32],
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TransferSpore {
        pub spore_id: [u8; 32],
        pub from: Address,
        pub to: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MeltSpore {
        pub spore_id: [u8; 32],
        pub from: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CreateCluster {
        pub cluster_id: [u8; 32],
        pub to: Address,
        pub data_hash: [u8; 32],
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TransferCluster {
        pub cluster_id: [u8; 32],
        pub from: Address,
        pub to: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CreateClusterProxy {
        pub cluster_id: [u8; 32],
        pub cluster_proxy_id: [u8; 32],
        pub to: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TransferClusterProxy {
        pub cluster_id: [u8; 32],
        pub cluster_proxy_id: [u8; 32],
        pub from: Address,
        pub to: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MeltClusterProxy {
        pub cluster_id: [u8; 32],
        pub cluster_proxy_id: [u8; 32],
        pub from: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CreateClusterAgent {
        pub cluster_id: [u8; 32],
        pub cluster_proxy_id: [u8; 32],
        pub to: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TransferClusterAgent {
        pub cluster_id: [u8; 32],
        pub from: Address,
        pub to: Address,
    }
}

table_record! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MeltClusterAgent {
        pub cluster_id: [u8; 32],
        pub from: Address,
    }
}

macro_rules! spore_action_union {
    ($($item_id:literal => $variant:ident),+ $(,)?) => {
        /// The payload of a spore `Action`.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum SporeAction {
            $( $variant($variant), )+
        }

        impl SporeAction {
            pub fn item_id(&self) -> u32 {
                match self {
                    $( SporeAction::$variant(_) => $item_id, )+
                }
            }

            pub fn item_name(&self) -> &'static str {
                match self {
                    $( SporeAction::$variant(_) => stringify!($variant), )+
                }
            }
        }

        impl Codec for SporeAction {
            fn pack(&self) -> Bytes {
                let item = match self {
                    $( SporeAction::$variant(item) => item.pack(), )+
                };
                pack_union(self.item_id(), &item).into()
            }

            fn unpack(slice: &[u8]) -> CodecResult<Self> {
                let (item_id, item) = unpack_union(slice)?;
                match item_id {
                    $( $item_id => $variant::unpack(item).map(SporeAction::$variant), )+
                    _ => Err(CodecError::UnknownItem(item_id)),
                }
            }
        }

        $(
            impl From<$variant> for SporeAction {
                fn from(item: $variant) -> Self {
                    SporeAction::$variant(item)
                }
            }
        )+
    };
}

spore_action_union! {
    0 => CreateSpore,
    1 => TransferSpore,
    2 => MeltSpore,
    3 => CreateCluster,
    4 => TransferCluster,
    5 => CreateClusterProxy,
    6 => TransferClusterProxy,
    7 => MeltClusterProxy,
    8 => CreateClusterAgent,
    9 => TransferClusterAgent,
    10 => MeltClusterAgent,
}
