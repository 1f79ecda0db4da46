//! The transaction skeleton and the transformations over it.
//!
//! A [`TransactionSkeleton`] is a plain value: every transformation takes it
//! by value and returns the next one, so a failed step leaves the caller
//! with the last good skeleton.

mod capacity;
mod fee;
mod skeleton;
#[cfg(test)]
mod tests;
mod type_id;

pub use crate::capacity::{
    CapacitySnapshot, Funding, inject_needed_capacity, pay_fee_by_fee_rate, pay_fee_by_output,
};
pub use crate::fee::{DEFAULT_MIN_FEE_RATE, FeeRate, calculate_fee};
pub use crate::skeleton::{FixedEntry, FixedField, SetupOptions, TransactionSkeleton};
pub use crate::type_id::{TYPE_ID_PLACEHOLDER, calculate_type_id};
