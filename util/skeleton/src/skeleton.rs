use std::collections::{BTreeMap, BTreeSet};

use ckb_spore_error::{Error, Result};
use ckb_spore_traits::Cell;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, TransactionBuilder, TransactionView},
    packed::{self, Byte32, CellDep, CellInput, OutPoint, Script, WitnessArgs},
    prelude::*,
};

/// Size of a secp256k1 recoverable signature, the placeholder every lock
/// group reserves in its first witness.
const SIGNATURE_PLACEHOLDER_SIZE: usize = 65;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FixedField {
    Inputs,
    Outputs,
}

/// An entry excluded from capacity rebalancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedEntry {
    pub field: FixedField,
    pub index: usize,
}

impl FixedEntry {
    pub fn output(index: usize) -> Self {
        FixedEntry {
            field: FixedField::Outputs,
            index,
        }
    }

    pub fn input(index: usize) -> Self {
        FixedEntry {
            field: FixedField::Inputs,
            index,
        }
    }
}

/// How [`TransactionSkeleton::setup_cell`] treats the consumed cell.
#[derive(Clone, Debug, Default)]
pub struct SetupOptions {
    pub since: u64,
    /// Recreate the cell as an output, replaced by `output` when set.
    pub recreate: bool,
    pub output: Option<Cell>,
    /// Exclude the recreated output from capacity rebalancing.
    pub fix_output: bool,
    /// Overrides the lock witness placeholder.
    pub witness: Option<Bytes>,
}

impl SetupOptions {
    /// Consumes the cell and recreates it unchanged at a fixed index.
    pub fn recreate_fixed() -> Self {
        SetupOptions {
            recreate: true,
            fix_output: true,
            ..Default::default()
        }
    }
}

/// A transaction under construction.
///
/// Inputs carry their resolved cells so capacity can be balanced without
/// querying the ledger again. Witnesses at index `i < inputs.len()` belong to
/// input `i`; any further witness (such as the cobuild layout) trails them.
#[derive(Clone, Debug, Default)]
pub struct TransactionSkeleton {
    cell_deps: Vec<CellDep>,
    header_deps: Vec<Byte32>,
    inputs: Vec<Cell>,
    input_sinces: BTreeMap<usize, u64>,
    outputs: Vec<Cell>,
    witnesses: Vec<Bytes>,
    fixed_entries: BTreeSet<FixedEntry>,
    change_output: Option<usize>,
}

impl TransactionSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &[Cell] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Cell] {
        &self.outputs
    }

    pub fn output(&self, index: usize) -> Result<&Cell> {
        self.outputs
            .get(index)
            .ok_or_else(|| Error::invariant(format!("output {index} does not exist")))
    }

    pub fn witnesses(&self) -> &[Bytes] {
        &self.witnesses
    }

    pub fn cell_deps(&self) -> &[CellDep] {
        &self.cell_deps
    }

    pub fn header_deps(&self) -> &[Byte32] {
        &self.header_deps
    }

    pub fn input_since(&self, index: usize) -> u64 {
        self.input_sinces.get(&index).copied().unwrap_or_default()
    }

    pub fn change_output(&self) -> Option<usize> {
        self.change_output
    }

    pub fn fixed_entries(&self) -> &BTreeSet<FixedEntry> {
        &self.fixed_entries
    }

    pub fn is_fixed(&self, entry: FixedEntry) -> bool {
        self.fixed_entries.contains(&entry)
    }

    pub fn find_input(&self, out_point: &OutPoint) -> Option<usize> {
        self.inputs
            .iter()
            .position(|cell| cell.out_point.as_ref() == Some(out_point))
    }

    pub fn has_input_with_lock(&self, lock: &Script) -> bool {
        self.inputs.iter().any(|cell| &cell.lock() == lock)
    }

    pub fn has_output_with_lock(&self, lock: &Script) -> bool {
        self.outputs.iter().any(|cell| &cell.lock() == lock)
    }

    /// The input at `index` as it appears in the transaction.
    pub fn cell_input(&self, index: usize) -> Result<CellInput> {
        let cell = self
            .inputs
            .get(index)
            .ok_or_else(|| Error::invariant(format!("input {index} does not exist")))?;
        let out_point = cell
            .out_point
            .clone()
            .ok_or_else(|| Error::invariant(format!("input {index} has no out point")))?;
        Ok(CellInput::new(out_point, self.input_since(index)))
    }

    pub fn inputs_capacity(&self) -> Result<Capacity> {
        sum_capacity(&self.inputs)
    }

    pub fn outputs_capacity(&self) -> Result<Capacity> {
        sum_capacity(&self.outputs)
    }

    /// Appends a live cell to the inputs.
    ///
    /// The first input of each lock group receives a `WitnessArgs` with a
    /// zeroed signature; the others an empty witness.
    pub fn add_input(mut self, cell: Cell, since: u64) -> Result<Self> {
        let out_point = cell
            .out_point
            .clone()
            .ok_or_else(|| Error::invariant("an input cell must be live"))?;
        if self.find_input(&out_point).is_some() {
            return Err(Error::invariant(format!("{out_point} is already an input")));
        }
        let witness = if self.has_input_with_lock(&cell.lock()) {
            Bytes::new()
        } else {
            WitnessArgs::new_builder()
                .lock(Some(Bytes::from(vec![0u8; SIGNATURE_PLACEHOLDER_SIZE])).pack())
                .build()
                .as_bytes()
        };
        let index = self.inputs.len();
        if self.witnesses.len() < index {
            self.witnesses.resize(index, Bytes::new());
        }
        self.witnesses.insert(index, witness);
        if since != 0 {
            self.input_sinces.insert(index, since);
        }
        self.inputs.push(cell);
        Ok(self)
    }

    /// Consumes `cell` and, as requested, recreates it as an output.
    pub fn setup_cell(self, cell: Cell, options: SetupOptions) -> Result<Self> {
        let SetupOptions {
            since,
            recreate,
            output,
            fix_output,
            witness,
        } = options;
        let recreated = match output {
            Some(output) => Some(output),
            None if recreate => Some(Cell::new(cell.output.clone(), cell.data.clone())),
            None => None,
        };
        let mut skeleton = self.add_input(cell, since)?;
        if let Some(witness) = witness {
            let index = skeleton.inputs.len() - 1;
            skeleton = skeleton.set_witness(index, witness)?;
        }
        if let Some(output) = recreated {
            skeleton = skeleton.add_output(output);
            if fix_output {
                let index = skeleton.outputs.len() - 1;
                skeleton = skeleton.fix_output(index)?;
            }
        }
        Ok(skeleton)
    }

    pub fn add_output(mut self, cell: Cell) -> Self {
        self.outputs.push(Cell {
            out_point: None,
            ..cell
        });
        self
    }

    pub fn update_output(mut self, index: usize, cell: Cell) -> Result<Self> {
        let slot = self
            .outputs
            .get_mut(index)
            .ok_or_else(|| Error::invariant(format!("output {index} does not exist")))?;
        *slot = cell;
        Ok(self)
    }

    pub fn fix_output(mut self, index: usize) -> Result<Self> {
        if index >= self.outputs.len() {
            return Err(Error::invariant(format!("output {index} does not exist")));
        }
        if self.change_output == Some(index) {
            return Err(Error::invariant(format!("output {index} is the change output")));
        }
        self.fixed_entries.insert(FixedEntry::output(index));
        Ok(self)
    }

    /// Designates the output absorbing surplus capacity.
    pub fn set_change_output(mut self, index: Option<usize>) -> Result<Self> {
        if let Some(index) = index {
            if index >= self.outputs.len() {
                return Err(Error::invariant(format!("output {index} does not exist")));
            }
            if self.is_fixed(FixedEntry::output(index)) {
                return Err(Error::invariant(format!("output {index} is fixed")));
            }
        }
        self.change_output = index;
        Ok(self)
    }

    /// Adds a cell dep unless the same out point and dep type is present.
    pub fn add_cell_dep(mut self, cell_dep: CellDep) -> Self {
        if !self.cell_deps.contains(&cell_dep) {
            self.cell_deps.push(cell_dep);
        }
        self
    }

    pub fn add_cell_deps<I: IntoIterator<Item = CellDep>>(self, cell_deps: I) -> Self {
        cell_deps
            .into_iter()
            .fold(self, |skeleton, cell_dep| skeleton.add_cell_dep(cell_dep))
    }

    pub fn add_header_dep(mut self, hash: Byte32) -> Self {
        if !self.header_deps.contains(&hash) {
            self.header_deps.push(hash);
        }
        self
    }

    pub fn set_witness(mut self, index: usize, witness: Bytes) -> Result<Self> {
        let slot = self
            .witnesses
            .get_mut(index)
            .ok_or_else(|| Error::invariant(format!("witness {index} does not exist")))?;
        *slot = witness;
        Ok(self)
    }

    /// Appends a witness after every input-aligned one.
    pub fn push_witness(mut self, witness: Bytes) -> Self {
        if self.witnesses.len() < self.inputs.len() {
            self.witnesses.resize(self.inputs.len(), Bytes::new());
        }
        self.witnesses.push(witness);
        self
    }

    pub fn to_transaction_view(&self) -> Result<TransactionView> {
        let inputs = (0..self.inputs.len())
            .map(|index| self.cell_input(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(TransactionBuilder::default()
            .cell_deps(self.cell_deps.clone())
            .header_deps(self.header_deps.clone())
            .inputs(inputs)
            .outputs(self.outputs.iter().map(|cell| cell.output.clone()))
            .outputs_data(self.outputs.iter().map(|cell| cell.data.pack()))
            .witnesses(self.witnesses.iter().map(|witness| witness.pack()))
            .build())
    }

    /// Size the transaction occupies in a block, counting the offset of the
    /// block's transaction vector.
    pub fn serialized_size(&self) -> Result<usize> {
        let tx: packed::Transaction = self.to_transaction_view()?.data();
        Ok(tx.as_slice().len() + 4)
    }

    /// Fails when the serialized transaction is larger than `limit`.
    pub fn ensure_size(&self, limit: Option<usize>) -> Result<()> {
        let Some(limit) = limit else {
            return Ok(());
        };
        let size = self.serialized_size()?;
        if size > limit {
            return Err(Error::SizeExceeded { size, limit });
        }
        Ok(())
    }
}

fn sum_capacity(cells: &[Cell]) -> Result<Capacity> {
    cells.iter().try_fold(Capacity::zero(), |total, cell| {
        Ok(total.safe_add(cell.capacity())?)
    })
}
