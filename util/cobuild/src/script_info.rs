use ckb_hash::blake2b_256;
use ckb_spore_codec::{Codec, ScriptInfo};

/// Molecule schema of the action data, embedded in the script info so
/// auditors need no schema registry.
pub const SPORE_ACTION_SCHEMA: &str = r#"
array Byte32 [byte; 32];
vector Bytes <byte>;
table Script { code_hash: Byte32, hash_type: byte, args: Bytes }
union Address { Script }

table CreateSpore { spore_id: Byte32, to: Address, data_hash: Byte32 }
table TransferSpore { spore_id: Byte32, from: Address, to: Address }
table MeltSpore { spore_id: Byte32, from: Address }

table CreateCluster { cluster_id: Byte32, to: Address, data_hash: Byte32 }
table TransferCluster { cluster_id: Byte32, from: Address, to: Address }

table CreateClusterProxy { cluster_id: Byte32, cluster_proxy_id: Byte32, to: Address }
table TransferClusterProxy { cluster_id: Byte32, cluster_proxy_id: Byte32, from: Address, to: Address }
table MeltClusterProxy { cluster_id: Byte32, cluster_proxy_id: Byte32, from: Address }

table CreateClusterAgent { cluster_id: Byte32, cluster_proxy_id: Byte32, to: Address }
table TransferClusterAgent { cluster_id: Byte32, from: Address, to: Address }
table MeltClusterAgent { cluster_id: Byte32, from: Address }

union SporeActionData {
    CreateSpore, TransferSpore, MeltSpore,
    CreateCluster, TransferCluster,
    CreateClusterProxy, TransferClusterProxy, MeltClusterProxy,
    CreateClusterAgent, TransferClusterAgent, MeltClusterAgent,
}
"#;

/// Script info of the spore deployment whose type script hashes to
/// `script_hash`.
pub fn spore_script_info(script_hash: [u8; 32]) -> ScriptInfo {
    ScriptInfo {
        name: "spore".to_owned(),
        url: "https://spore.pro".to_owned(),
        script_hash,
        schema: SPORE_ACTION_SCHEMA.to_owned(),
        message_type: "SporeActionData".to_owned(),
    }
}

pub fn script_info_hash(info: &ScriptInfo) -> [u8; 32] {
    blake2b_256(info.pack())
}
