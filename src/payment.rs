//! Minimal payments to owners of fee-gated objects.

use ckb_logger::debug;
use ckb_spore_error::{Error, Result};
use ckb_spore_skeleton::TransactionSkeleton;
use ckb_spore_traits::Cell;
use ckb_types::{bytes::Bytes, core::Capacity, packed, prelude::*};

/// Payments owed in one transaction, one per receiving lock.
///
/// Objects sharing an owner are covered by the largest of their minimal
/// payments rather than the sum.
#[derive(Clone, Debug, Default)]
pub struct Payments {
    owed: Vec<(packed::Script, Capacity)>,
}

impl Payments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.owed.is_empty()
    }

    /// Requires at least `amount` to be paid to `lock`.
    pub fn require(&mut self, lock: packed::Script, amount: Capacity) {
        match self.owed.iter_mut().find(|(owner, _)| owner == &lock) {
            Some((_, owed)) => *owed = (*owed).max(amount),
            None => self.owed.push((lock, amount)),
        }
    }

    pub fn amount(&self, lock: &packed::Script) -> Option<Capacity> {
        self.owed
            .iter()
            .find(|(owner, _)| owner == lock)
            .map(|(_, amount)| *amount)
    }

    /// Appends one fixed payment output per lock, in the order the locks were
    /// first required. Returns each lock with its output index.
    pub fn inject(
        &self,
        mut skeleton: TransactionSkeleton,
    ) -> Result<(TransactionSkeleton, Vec<(packed::Script, usize)>)> {
        let mut indices = Vec::with_capacity(self.owed.len());
        for (lock, amount) in &self.owed {
            let cell = payment_cell(lock.clone(), *amount)?;
            skeleton = skeleton.add_output(cell);
            let index = skeleton.outputs().len() - 1;
            debug!("pay {} to output {}", amount.as_u64(), index);
            skeleton = skeleton.fix_output(index)?;
            indices.push((lock.clone(), index));
        }
        Ok((skeleton, indices))
    }
}

/// An empty cell carrying `amount` to `lock`.
pub(crate) fn payment_cell(lock: packed::Script, amount: Capacity) -> Result<Cell> {
    let output = packed::CellOutput::new_builder()
        .lock(lock)
        .capacity(amount.pack())
        .build();
    let cell = Cell::new(output, Bytes::new());
    if cell.capacity() < cell.occupied_capacity()? {
        return Err(Error::invariant(format!(
            "payment of {} cannot hold its own cell",
            amount.as_u64()
        )));
    }
    Ok(cell)
}
