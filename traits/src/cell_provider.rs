use ckb_types::packed::{OutPoint, Script};

use crate::Cell;

/// Liveness of a cell reported by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    Live,
    Dead,
    Unknown,
}

impl CellStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, CellStatus::Live)
    }
}

pub trait CellProvider {
    /// Fetches a cell and its liveness. The cell is returned whenever the
    /// ledger still knows its content.
    fn get_live_cell(&self, out_point: &OutPoint) -> anyhow::Result<(Option<Cell>, CellStatus)>;
}

pub trait CellIndexer {
    /// Finds a live cell whose type script runs the code of `type_script`
    /// with args starting with its args.
    fn find_cell_by_type(&self, type_script: &Script) -> anyhow::Result<Option<Cell>>;

    /// Returns the live cells guarded by `lock`, in indexer order.
    fn collect_cells_by_lock(&self, lock: &Script) -> anyhow::Result<Vec<Cell>>;
}
