use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
};

use ckb_spore_codec::{ClusterDataV2, Codec, DelegationArgs, DelegationArgsVersion, SporeData};
use ckb_spore_traits::{
    Cell, CellIndexer, CellProvider, CellStatus, ContentType, ContentTypeDecoder,
    FeeRateProvider, ParamValue, TransactionSender, TxStatus,
};
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, ScriptHashType, TransactionView},
    packed::{self, Byte32, OutPoint, Script},
    prelude::*,
};

use crate::{ScriptKind, SporeConfig, SporeContext};


const CKB: u64 = 100_000_000;

const CONFIG: &str = r#"
[[spore]]
tags = ["v2", "latest"]
behaviors = { cobuild = true }
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000001", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a1", index = "0x0" }, dep_type = "code" }]

[[cluster]]
tags = ["v2", "latest"]
behaviors = { lock_proxy = true, cobuild = true }
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000002", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a2", index = "0x0" }, dep_type = "code" }]

[[cluster_proxy]]
tags = ["v1", "latest"]
behaviors = { lock_proxy = true, cobuild = true }
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000003", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a3", index = "0x0" }, dep_type = "code" }]

[[cluster_agent]]
tags = ["v1", "latest"]
behaviors = { lock_proxy = true, cobuild = true }
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000004", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a4", index = "0x0" }, dep_type = "code" }]

[[mutant]]
tags = ["v1", "latest"]
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000005", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a5", index = "0x0" }, dep_type = "code" }]

[[lua]]
tags = ["v1", "latest"]
script = { code_hash = "0x0000000000000000000000000000000000000000000000000000000000000006", hash_type = "data1" }
cell_deps = [{ out_point = { tx_hash = "0x00000000000000000000000000000000000000000000000000000000000000a6", index = "0x0" }, dep_type = "code" }]
"#;

fn config() -> SporeConfig {
    SporeConfig::load_from_slice(CONFIG.as_bytes()).unwrap()
}

/// In-memory ledger, indexer, pool and node.
#[derive(Default)]
struct MockChain {
    cells: Vec<Cell>,
    dead: Vec<OutPoint>,
    statuses: RefCell<VecDeque<TxStatus>>,
}

impl MockChain {
    fn with_cells(cells: Vec<Cell>) -> Self {
        MockChain {
            cells,
            ..Default::default()
        }
    }

    fn with_statuses(statuses: Vec<TxStatus>) -> Self {
        MockChain {
            statuses: RefCell::new(statuses.into()),
            ..Default::default()
        }
    }

    fn kill(mut self, out_point: OutPoint) -> Self {
        self.dead.push(out_point);
        self
    }

    fn live_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| {
            cell.out_point
                .as_ref()
                .is_some_and(|out_point| !self.dead.contains(out_point))
        })
    }
}

impl CellProvider for MockChain {
    fn get_live_cell(&self, out_point: &OutPoint) -> anyhow::Result<(Option<Cell>, CellStatus)> {
        let cell = self
            .cells
            .iter()
            .find(|cell| cell.out_point.as_ref() == Some(out_point))
            .cloned();
        let status = match cell {
            Some(_) if self.dead.contains(out_point) => CellStatus::Dead,
            Some(_) => CellStatus::Live,
            None => CellStatus::Unknown,
        };
        Ok((cell, status))
    }
}

impl CellIndexer for MockChain {
    fn find_cell_by_type(&self, type_script: &Script) -> anyhow::Result<Option<Cell>> {
        let prefix = type_script.args().raw_data();
        Ok(self
            .live_cells()
            .find(|cell| {
                cell.type_().is_some_and(|script| {
                    script.code_hash() == type_script.code_hash()
                        && script.hash_type().as_slice() == type_script.hash_type().as_slice()
                        && script.args().raw_data().starts_with(&prefix)
                })
            })
            .cloned())
    }

    fn collect_cells_by_lock(&self, lock: &Script) -> anyhow::Result<Vec<Cell>> {
        Ok(self
            .live_cells()
            .filter(|cell| &cell.lock() == lock)
            .cloned()
            .collect())
    }
}

impl ContentTypeDecoder for MockChain {
    fn decode(&self, text: &str) -> anyhow::Result<ContentType> {
        let mut parts = text.split(';');
        let media_type = parts.next().unwrap_or_default().trim().to_owned();
        if !media_type.contains('/') {
            anyhow::bail!("invalid media type {media_type:?}");
        }
        let mut params = BTreeMap::new();
        for param in parts {
            let (key, value) = param
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("invalid parameter {param:?}"))?;
            let key = key.trim();
            let value = if key.ends_with("[]") {
                ParamValue::List(value.split(',').map(str::to_owned).collect())
            } else {
                ParamValue::Single(value.to_owned())
            };
            params.insert(key.to_owned(), value);
        }
        Ok(ContentType { media_type, params })
    }
}

impl FeeRateProvider for MockChain {
    fn min_fee_rate(&self) -> anyhow::Result<u64> {
        Ok(1000)
    }
}

impl TransactionSender for MockChain {
    fn send_transaction(&self, tx: &TransactionView) -> anyhow::Result<Byte32> {
        Ok(tx.hash())
    }

    fn transaction_status(&self, _hash: &Byte32) -> anyhow::Result<TxStatus> {
        Ok(self
            .statuses
            .borrow_mut()
            .pop_front()
            .unwrap_or(TxStatus::Pending))
    }
}

fn context<'a>(config: &'a SporeConfig, chain: &'a MockChain) -> SporeContext<'a> {
    SporeContext::new(config, chain, chain, chain).with_fee_rate_provider(chain)
}

fn lock(seed: u8) -> Script {
    packed::Script::new_builder()
        .code_hash([seed; 32].pack())
        .hash_type(ScriptHashType::Type.into())
        .args(Bytes::from(vec![seed; 20]).pack())
        .build()
}

fn out_point(seed: u8, index: u32) -> OutPoint {
    OutPoint::new([seed; 32].pack(), index)
}

fn capacity_cell(lock: Script, capacity: u64, seed: u8) -> Cell {
    let output = packed::CellOutput::new_builder()
        .capacity(Capacity::shannons(capacity).pack())
        .lock(lock)
        .build();
    Cell::new(output, Bytes::new()).with_out_point(out_point(seed, 0))
}

/// A live object of `kind` holding `margin` above its occupied capacity.
fn object_cell(
    config: &SporeConfig,
    kind: ScriptKind,
    args: Bytes,
    lock: Script,
    data: Bytes,
    margin: u64,
    seed: u8,
) -> Cell {
    let type_script = config.latest(kind).unwrap().new_script(args);
    let output = packed::CellOutput::new_builder()
        .lock(lock)
        .type_(Some(type_script).pack())
        .build();
    let cell = Cell::new(output, data);
    let capacity = cell
        .occupied_capacity()
        .unwrap()
        .safe_add(Capacity::shannons(margin))
        .unwrap();
    cell.with_capacity(capacity).with_out_point(out_point(seed, 0))
}

fn spore_cell(config: &SporeConfig, id: [u8; 32], lock: Script, margin: u64, seed: u8) -> Cell {
    let data = SporeData {
        content_type: "text/plain".to_owned(),
        content: Bytes::from_static(b"a spore"),
        cluster_id: None,
    };
    object_cell(
        config,
        ScriptKind::Spore,
        Bytes::copy_from_slice(&id),
        lock,
        data.pack(),
        margin,
        seed,
    )
}

fn cluster_cell(config: &SporeConfig, id: [u8; 32], lock: Script, seed: u8) -> Cell {
    let data = ClusterDataV2 {
        name: "cluster".to_owned(),
        description: "a cluster".to_owned(),
        mutant_id: None,
    };
    object_cell(
        config,
        ScriptKind::Cluster,
        Bytes::copy_from_slice(&id),
        lock,
        data.pack(),
        0,
        seed,
    )
}

fn proxy_cell(
    config: &SporeConfig,
    id: [u8; 32],
    cluster_id: [u8; 32],
    min_payment: Option<u64>,
    lock: Script,
    seed: u8,
) -> Cell {
    let args = DelegationArgs::new(id, min_payment)
        .pack_versioned(DelegationArgsVersion::V1)
        .unwrap();
    object_cell(
        config,
        ScriptKind::ClusterProxy,
        args,
        lock,
        Bytes::copy_from_slice(&cluster_id),
        0,
        seed,
    )
}

fn mutant_cell(
    config: &SporeConfig,
    id: [u8; 32],
    min_payment: Option<u64>,
    lock: Script,
    seed: u8,
) -> Cell {
    let args = DelegationArgs::new(id, min_payment)
        .pack_versioned(DelegationArgsVersion::V2)
        .unwrap();
    object_cell(
        config,
        ScriptKind::Mutant,
        args,
        lock,
        Bytes::from_static(b"return true"),
        0,
        seed,
    )
}

/// The code cell dep of a live cell.
fn dep_of(cell: &Cell) -> packed::CellDep {
    packed::CellDep::new_builder()
        .out_point(cell.out_point.clone().unwrap())
        .dep_type(ckb_types::core::DepType::Code.into())
        .build()
}
