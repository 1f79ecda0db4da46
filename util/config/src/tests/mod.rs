use std::io::Write;

use ckb_jsonrpc_types::ScriptHashType;
use ckb_spore_error::ErrorKind;
use ckb_types::{bytes::Bytes, h256, packed, prelude::*};
use pretty_assertions::assert_eq;

use crate::{ScriptKind, SporeConfig};

const CONFIG: &str = r#"
max_transaction_size = 512000

[[spore]]
tags = ["v1", "preview"]
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000001", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a1", index = "0x0" }, dep_type = "code" }]

[[spore]]
tags = ["v2", "latest"]
behaviors = { cobuild = true }
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000002", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a2", index = "0x0" }, dep_type = "code" }]

[[cluster]]
tags = ["v2", "latest"]
behaviors = { lock_proxy = true, cobuild = true }
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000003", hash_type = "type" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a3", index = "0x1" }, dep_type = "code" }]
"#;

fn config() -> SporeConfig {
    SporeConfig::load_from_slice(CONFIG.as_bytes()).unwrap()
}

#[test]
fn parse_script_table() {
    let config = config();
    assert_eq!(config.max_transaction_size, Some(512_000));
    assert_eq!(config.spore.len(), 2);
    assert!(config.cluster_proxy.is_empty());

    let cluster = &config.cluster[0];
    assert!(cluster.behaviors.lock_proxy);
    assert!(cluster.behaviors.cobuild);
    assert_eq!(cluster.script.hash_type, ScriptHashType::Type);
    assert!(!config.spore[0].behaviors.cobuild);
}

#[test]
fn lookup_by_tags() {
    let config = config();
    let latest = config.latest(ScriptKind::Spore).unwrap();
    assert!(latest.has_tag("v2"));
    let preview = config
        .script_by_tags(ScriptKind::Spore, &["v1", "preview"])
        .unwrap();
    assert_eq!(
        preview.script.code_hash,
        h256!("0x0000000000000000000000000000000000000000000000000000000000000001")
    );

    let err = config
        .script_by_tags(ScriptKind::Spore, &["v1", "latest"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    assert_eq!(
        config.latest(ScriptKind::Mutant).unwrap_err().kind(),
        ErrorKind::UnsupportedVersion
    );
}

#[test]
fn lookup_by_script_ignores_args() {
    let config = config();
    let entry = &config.spore[0];
    let script = entry.new_script(Bytes::from(vec![7u8; 32]));
    assert_eq!(
        config.script_by_id(ScriptKind::Spore, &script).unwrap(),
        entry
    );
    assert_eq!(
        config.find_by_script(&script).map(|(kind, _)| kind),
        Some(ScriptKind::Spore)
    );
    assert!(!config.is_kind(ScriptKind::Cluster, &script));

    // same code hash, different hash type
    let other = script
        .as_builder()
        .hash_type(ckb_types::core::ScriptHashType::Type.into())
        .build();
    assert_eq!(
        config
            .script_by_id(ScriptKind::Spore, &other)
            .unwrap_err()
            .kind(),
        ErrorKind::UnsupportedVersion
    );
    assert!(config.find_by_script(&other).is_none());
}

#[test]
fn cell_deps_are_packed() {
    let config = config();
    let deps = config.cluster[0].packed_cell_deps();
    assert_eq!(deps.len(), 1);
    let index: u32 = deps[0].out_point().index().unpack();
    assert_eq!(index, 1);
    assert_eq!(
        deps[0].out_point().tx_hash(),
        h256!("0x00000000000000000000000000000000000000000000000000000000000000a3").pack()
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SporeConfig::load_from_slice(b"spores = []").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let loaded = SporeConfig::load_from_file(file.path()).unwrap();
    assert_eq!(loaded, config());

    let missing = file.path().with_extension("missing");
    assert_eq!(
        SporeConfig::load_from_file(missing).unwrap_err().kind(),
        ErrorKind::Config
    );
}

#[test]
fn empty_config_is_default() {
    let config = SporeConfig::load_from_slice(b"").unwrap();
    assert_eq!(config, SporeConfig::default());
    let lock: packed::Script = Default::default();
    assert!(config.find_by_script(&lock).is_none());
}
