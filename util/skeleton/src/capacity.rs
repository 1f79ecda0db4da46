//! Capacity balancing.
//!
//! Outputs are funded by collecting pure capacity cells from the funding
//! sources, and any surplus is returned through a single change output. The
//! same loop pays the fee: each round recomputes the fee from the current
//! size, so the final skeleton always satisfies
//! `inputs_capacity == outputs_capacity + fee`.

use std::collections::VecDeque;

use ckb_logger::debug;
use ckb_spore_error::{Error, Result};
use ckb_spore_traits::{Cell, CellIndexer};
use ckb_types::{bytes::Bytes, core::Capacity, packed, prelude::*};

use crate::{FeeRate, TransactionSkeleton};

/// Capacity totals of a skeleton at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacitySnapshot {
    pub inputs_len: usize,
    pub outputs_len: usize,
    pub inputs_capacity: Capacity,
    pub outputs_capacity: Capacity,
}

impl CapacitySnapshot {
    pub fn new(skeleton: &TransactionSkeleton) -> Result<Self> {
        Ok(CapacitySnapshot {
            inputs_len: skeleton.inputs().len(),
            outputs_len: skeleton.outputs().len(),
            inputs_capacity: skeleton.inputs_capacity()?,
            outputs_capacity: skeleton.outputs_capacity()?,
        })
    }

    /// Inputs minus outputs, when inputs cover the outputs.
    pub fn surplus(&self) -> Option<Capacity> {
        self.inputs_capacity.safe_sub(self.outputs_capacity).ok()
    }

    /// Outputs minus inputs, when the outputs are not covered.
    pub fn shortfall(&self) -> Option<Capacity> {
        self.outputs_capacity
            .safe_sub(self.inputs_capacity)
            .ok()
            .filter(|shortfall| !shortfall.is_zero())
    }
}

/// Where capacity comes from and where the surplus goes.
pub struct Funding<'a> {
    /// Locks whose pure capacity cells may be consumed, in preference order.
    pub sources: Vec<packed::Script>,
    /// Lock of the change output appended for the surplus.
    pub change_lock: packed::Script,
    pub collector: &'a dyn CellIndexer,
}

impl<'a> Funding<'a> {
    pub fn new(
        sources: Vec<packed::Script>,
        change_lock: packed::Script,
        collector: &'a dyn CellIndexer,
    ) -> Self {
        Funding {
            sources,
            change_lock,
            collector,
        }
    }

    /// Funds from one lock and returns the change to it.
    pub fn from_lock(lock: packed::Script, collector: &'a dyn CellIndexer) -> Self {
        Funding::new(vec![lock.clone()], lock, collector)
    }

    pub fn is_source(&self, lock: &packed::Script) -> bool {
        self.sources.contains(lock)
    }

    fn change_cell(&self) -> Result<Cell> {
        let output = packed::CellOutput::new_builder()
            .lock(self.change_lock.clone())
            .build();
        Cell::new(output, Bytes::new()).with_minimal_capacity()
    }
}

/// Pulls funding cells lazily, one source at a time.
pub(crate) struct CellCollector<'f, 'a> {
    funding: &'f Funding<'a>,
    next_source: usize,
    pending: VecDeque<Cell>,
}

impl<'f, 'a> CellCollector<'f, 'a> {
    pub(crate) fn new(funding: &'f Funding<'a>) -> Self {
        CellCollector {
            funding,
            next_source: 0,
            pending: VecDeque::new(),
        }
    }

    /// The next pure capacity cell the skeleton does not spend yet.
    pub(crate) fn next(&mut self, skeleton: &TransactionSkeleton) -> Result<Option<Cell>> {
        loop {
            while let Some(cell) = self.pending.pop_front() {
                let usable = cell.is_pure_capacity()
                    && cell
                        .out_point
                        .as_ref()
                        .is_some_and(|out_point| skeleton.find_input(out_point).is_none());
                if usable {
                    return Ok(Some(cell));
                }
            }
            let Some(source) = self.funding.sources.get(self.next_source) else {
                return Ok(None);
            };
            self.next_source += 1;
            self.pending = self.funding.collector.collect_cells_by_lock(source)?.into();
        }
    }
}

/// Collects inputs until they cover the outputs and puts the surplus into
/// the change output.
pub fn inject_needed_capacity(
    skeleton: TransactionSkeleton,
    funding: &Funding,
) -> Result<TransactionSkeleton> {
    balance(skeleton, funding, None)
}

/// Like [`inject_needed_capacity`], additionally paying the fee of the final
/// transaction at `fee_rate`.
pub fn pay_fee_by_fee_rate(
    skeleton: TransactionSkeleton,
    funding: &Funding,
    fee_rate: FeeRate,
) -> Result<TransactionSkeleton> {
    balance(skeleton, funding, Some(fee_rate))
}

/// Deducts the fee from the capacity margin of the output at `index`.
pub fn pay_fee_by_output(
    skeleton: TransactionSkeleton,
    index: usize,
    fee_rate: FeeRate,
) -> Result<TransactionSkeleton> {
    let fee = fee_rate.fee(skeleton.serialized_size()?)?;
    let output = skeleton.output(index)?.clone();
    let margin = output.capacity_margin()?;
    if margin.is_zero() {
        return Err(Error::invariant(format!(
            "output {index} has no capacity margin to pay the fee"
        )));
    }
    if margin < fee {
        return Err(Error::InsufficientCapacity {
            required: fee.as_u64(),
            available: margin.as_u64(),
        });
    }
    debug!("pay fee {} from the margin of output {}", fee.as_u64(), index);
    let capacity = output.capacity().safe_sub(fee)?;
    skeleton.update_output(index, output.with_capacity(capacity))
}

fn fee_of(skeleton: &TransactionSkeleton, fee_rate: Option<FeeRate>) -> Result<Capacity> {
    match fee_rate {
        Some(fee_rate) => fee_rate.fee(skeleton.serialized_size()?),
        None => Ok(Capacity::zero()),
    }
}

fn balance(
    mut skeleton: TransactionSkeleton,
    funding: &Funding,
    fee_rate: Option<FeeRate>,
) -> Result<TransactionSkeleton> {
    let mut collector = CellCollector::new(funding);
    loop {
        let inputs_capacity = skeleton.inputs_capacity()?;
        let outputs_capacity = skeleton.outputs_capacity()?;
        let fee = fee_of(&skeleton, fee_rate)?;

        let required = match skeleton.change_output() {
            Some(index) => {
                let change = skeleton.output(index)?.clone();
                let required = outputs_capacity
                    .safe_sub(change.capacity())?
                    .safe_add(fee)?;
                let floor = required.safe_add(change.occupied_capacity()?)?;
                if inputs_capacity >= floor {
                    let capacity = inputs_capacity.safe_sub(required)?;
                    debug!(
                        "balanced with change {} and fee {}",
                        capacity.as_u64(),
                        fee.as_u64()
                    );
                    return skeleton.update_output(index, change.with_capacity(capacity));
                }
                floor
            }
            None => {
                let required = outputs_capacity.safe_add(fee)?;
                if inputs_capacity == required {
                    debug!("balanced without change, fee {}", fee.as_u64());
                    return Ok(skeleton);
                }
                if inputs_capacity > required {
                    let change = funding.change_cell()?;
                    let candidate = skeleton.clone().add_output(change.clone());
                    let fee = fee_of(&candidate, fee_rate)?;
                    let required = outputs_capacity.safe_add(fee)?;
                    let floor = required.safe_add(change.capacity())?;
                    if inputs_capacity >= floor {
                        let capacity = inputs_capacity.safe_sub(required)?;
                        let index = candidate.outputs().len() - 1;
                        debug!(
                            "append change {} at {}, fee {}",
                            capacity.as_u64(),
                            index,
                            fee.as_u64()
                        );
                        return candidate
                            .update_output(index, change.with_capacity(capacity))?
                            .set_change_output(Some(index));
                    }
                    floor
                } else {
                    required
                }
            }
        };

        match collector.next(&skeleton)? {
            Some(cell) => {
                debug!(
                    "collect {} from {:?}",
                    cell.capacity().as_u64(),
                    cell.out_point.as_ref().map(|out_point| out_point.to_string())
                );
                skeleton = skeleton.add_input(cell, 0)?;
            }
            None => {
                return Err(Error::InsufficientCapacity {
                    required: required.as_u64(),
                    available: inputs_capacity.as_u64(),
                });
            }
        }
    }
}
