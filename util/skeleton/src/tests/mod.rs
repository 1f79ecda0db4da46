use std::collections::HashMap;

use ckb_spore_traits::{Cell, CellIndexer};
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, ScriptHashType},
    packed::{self, OutPoint, Script},
    prelude::*,
};


const CKB: u64 = 100_000_000;

#[derive(Default)]
struct MockIndexer {
    cells: HashMap<Script, Vec<Cell>>,
}

impl MockIndexer {
    fn with_cells(cells: Vec<Cell>) -> Self {
        let mut indexer = MockIndexer::default();
        for cell in cells {
            indexer.cells.entry(cell.lock()).or_default().push(cell);
        }
        indexer
    }
}

impl CellIndexer for MockIndexer {
    fn find_cell_by_type(&self, type_script: &Script) -> anyhow::Result<Option<Cell>> {
        Ok(self
            .cells
            .values()
            .flatten()
            .find(|cell| cell.type_().as_ref() == Some(type_script))
            .cloned())
    }

    fn collect_cells_by_lock(&self, lock: &Script) -> anyhow::Result<Vec<Cell>> {
        Ok(self.cells.get(lock).cloned().unwrap_or_default())
    }
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

fn new_cell(lock: Script, capacity: u64) -> Cell {
    let output = packed::CellOutput::new_builder()
        .capacity(Capacity::shannons(capacity).pack())
        .lock(lock)
        .build();
    Cell::new(output, Bytes::new())
}

fn live_cell(lock: Script, capacity: u64, seed: u8) -> Cell {
    new_cell(lock, capacity).with_out_point(out_point(seed, 0))
}
