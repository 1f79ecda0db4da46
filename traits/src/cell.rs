use ckb_spore_error::Result;
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellOutput, OutPoint, Script},
    prelude::*,
};

/// A cell, either live on chain (with an out point) or about to be created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub output: CellOutput,
    pub data: Bytes,
    pub out_point: Option<OutPoint>,
}

impl Cell {
    pub fn new(output: CellOutput, data: Bytes) -> Self {
        Cell {
            output,
            data,
            out_point: None,
        }
    }

    pub fn with_out_point(mut self, out_point: OutPoint) -> Self {
        self.out_point = Some(out_point);
        self
    }

    pub fn capacity(&self) -> Capacity {
        self.output.capacity().unpack()
    }

    pub fn lock(&self) -> Script {
        self.output.lock()
    }

    pub fn type_(&self) -> Option<Script> {
        self.output.type_().to_opt()
    }

    /// A cell without type script and data only stores capacity.
    pub fn is_pure_capacity(&self) -> bool {
        self.type_().is_none() && self.data.is_empty()
    }

    /// The capacity the cell needs to store its lock, type and data.
    pub fn occupied_capacity(&self) -> Result<Capacity> {
        let data_capacity = Capacity::bytes(self.data.len())?;
        Ok(self.output.occupied_capacity(data_capacity)?)
    }

    /// The capacity above the occupied one, zero when the cell lacks
    /// capacity.
    pub fn capacity_margin(&self) -> Result<Capacity> {
        let occupied = self.occupied_capacity()?;
        Ok(self
            .capacity()
            .safe_sub(occupied)
            .unwrap_or_else(|_| Capacity::zero()))
    }

    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.output = self.output.as_builder().capacity(capacity.pack()).build();
        self
    }

    /// Raises the capacity to the occupied one when it falls short.
    pub fn with_minimal_capacity(self) -> Result<Self> {
        let occupied = self.occupied_capacity()?;
        if self.capacity() < occupied {
            Ok(self.with_capacity(occupied))
        } else {
            Ok(self)
        }
    }

    pub fn with_lock(mut self, lock: Script) -> Self {
        self.output = self.output.as_builder().lock(lock).build();
        self
    }

    pub fn with_type(mut self, type_: Option<Script>) -> Self {
        self.output = self.output.as_builder().type_(type_.pack()).build();
        self
    }

    pub fn with_data(mut self, data: Bytes) -> Self {
        self.data = data;
        self
    }
}
