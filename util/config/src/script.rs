use ckb_jsonrpc_types::{CellDep, ScriptHashType};
use ckb_types::{H256, bytes::Bytes, core, packed, prelude::*};
use serde::{Deserialize, Serialize};

/// The identity of a script, without args.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptId {
    pub code_hash: H256,
    pub hash_type: ScriptHashType,
}

impl ScriptId {
    pub fn new(code_hash: H256, hash_type: ScriptHashType) -> Self {
        ScriptId {
            code_hash,
            hash_type,
        }
    }

    /// Whether `script` runs this code, whatever its args.
    pub fn matches(&self, script: &packed::Script) -> bool {
        let hash_type: core::ScriptHashType = self.hash_type.clone().into();
        script.code_hash() == self.code_hash.pack()
            && Into::<u8>::into(script.hash_type()) == Into::<u8>::into(hash_type)
    }

    pub fn to_script(&self, args: Bytes) -> packed::Script {
        let hash_type: core::ScriptHashType = self.hash_type.clone().into();
        packed::Script::new_builder()
            .code_hash(self.code_hash.pack())
            .hash_type(hash_type.into())
            .args(args.pack())
            .build()
    }
}

/// Optional protocol features supported by a deployment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptBehaviors {
    /// Objects of this deployment can be referenced through a cell sharing
    /// their lock instead of being included.
    #[serde(default)]
    pub lock_proxy: bool,
    /// The script reads cobuild actions from the witness.
    #[serde(default)]
    pub cobuild: bool,
}

/// One deployment of an object kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    #[serde(default)]
    pub tags: Vec<String>,
    pub script: ScriptId,
    pub cell_deps: Vec<CellDep>,
    #[serde(default)]
    pub behaviors: ScriptBehaviors,
}

impl ScriptEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn new_script(&self, args: Bytes) -> packed::Script {
        self.script.to_script(args)
    }

    pub fn packed_cell_deps(&self) -> Vec<packed::CellDep> {
        self.cell_deps.iter().cloned().map(Into::into).collect()
    }
}
