//! Script table of the spore protocol.
//!
//! Every object kind may be deployed several times (a test version, a
//! version with cobuild support, ...). Each deployment is a [`ScriptEntry`]
//! tagged with free-form labels, and the entry tagged `latest` is the one new
//! objects are created with. Existing objects are always handled with the
//! entry matching the script their cell carries.

mod script;
#[cfg(test)]
mod tests;

use std::{fs, path::Path};

use ckb_spore_error::{Error, Result};
use ckb_types::packed;
use serde::{Deserialize, Serialize};

pub use script::{ScriptBehaviors, ScriptEntry, ScriptId};

/// The tag of the entry used for brand-new objects.
pub const LATEST_TAG: &str = "latest";

/// Object kinds with their own script table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    Spore,
    Cluster,
    ClusterProxy,
    ClusterAgent,
    Mutant,
    Lua,
}

impl ScriptKind {
    /// All kinds, in the order [`SporeConfig::find_by_script`] searches them.
    pub const ALL: [ScriptKind; 6] = [
        ScriptKind::Spore,
        ScriptKind::Cluster,
        ScriptKind::ClusterProxy,
        ScriptKind::ClusterAgent,
        ScriptKind::Mutant,
        ScriptKind::Lua,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScriptKind::Spore => "spore",
            ScriptKind::Cluster => "cluster",
            ScriptKind::ClusterProxy => "cluster_proxy",
            ScriptKind::ClusterAgent => "cluster_agent",
            ScriptKind::Mutant => "mutant",
            ScriptKind::Lua => "lua",
        }
    }
}

/// Spore script configuration.
///
/// ```toml
/// max_transaction_size = 512000
///
/// [[spore]]
/// tags = ["v2", "latest"]
/// behaviors = { cobuild = true }
/// script = { code_hash = "0x...", hash_type = "data1" }
/// cell_deps = [{ out_point = { tx_hash = "0x...", index = "0x0" }, dep_type = "code" }]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SporeConfig {
    #[serde(default)]
    pub spore: Vec<ScriptEntry>,
    #[serde(default)]
    pub cluster: Vec<ScriptEntry>,
    #[serde(default)]
    pub cluster_proxy: Vec<ScriptEntry>,
    #[serde(default)]
    pub cluster_agent: Vec<ScriptEntry>,
    #[serde(default)]
    pub mutant: Vec<ScriptEntry>,
    #[serde(default)]
    pub lua: Vec<ScriptEntry>,
    /// Assembled transactions larger than this are refused.
    #[serde(default)]
    pub max_transaction_size: Option<usize>,
}

impl SporeConfig {
    pub fn load_from_slice(slice: &[u8]) -> Result<Self> {
        toml::from_slice(slice).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)
            .map_err(|err| Error::Config(format!("read {}: {err}", path.display())))?;
        Self::load_from_slice(&content)
    }

    /// Returns every deployment of `kind`.
    pub fn entries(&self, kind: ScriptKind) -> &[ScriptEntry] {
        match kind {
            ScriptKind::Spore => &self.spore,
            ScriptKind::Cluster => &self.cluster,
            ScriptKind::ClusterProxy => &self.cluster_proxy,
            ScriptKind::ClusterAgent => &self.cluster_agent,
            ScriptKind::Mutant => &self.mutant,
            ScriptKind::Lua => &self.lua,
        }
    }

    /// Returns the first entry of `kind` carrying every tag in `tags`.
    pub fn script_by_tags(&self, kind: ScriptKind, tags: &[&str]) -> Result<&ScriptEntry> {
        self.entries(kind)
            .iter()
            .find(|entry| tags.iter().all(|tag| entry.has_tag(tag)))
            .ok_or_else(|| {
                Error::unsupported(format!("no {} script tagged {:?}", kind.name(), tags))
            })
    }

    /// Returns the entry of `kind` whose identity matches `script`, ignoring
    /// args.
    pub fn script_by_id(&self, kind: ScriptKind, script: &packed::Script) -> Result<&ScriptEntry> {
        self.entries(kind)
            .iter()
            .find(|entry| entry.script.matches(script))
            .ok_or_else(|| {
                Error::unsupported(format!(
                    "{} is not a known {} script",
                    script.code_hash(),
                    kind.name()
                ))
            })
    }

    pub fn latest(&self, kind: ScriptKind) -> Result<&ScriptEntry> {
        self.script_by_tags(kind, &[LATEST_TAG])
    }

    /// Searches every kind for the entry matching `script`.
    pub fn find_by_script(&self, script: &packed::Script) -> Option<(ScriptKind, &ScriptEntry)> {
        ScriptKind::ALL.iter().find_map(|kind| {
            self.entries(*kind)
                .iter()
                .find(|entry| entry.script.matches(script))
                .map(|entry| (*kind, entry))
        })
    }

    /// Whether `script` is any deployment of `kind`.
    pub fn is_kind(&self, kind: ScriptKind, script: &packed::Script) -> bool {
        self.script_by_id(kind, script).is_ok()
    }
}
