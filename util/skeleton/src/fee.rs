use ckb_spore_error::{Error, Result};
use ckb_types::core::Capacity;

const KB: u64 = 1000;

/// Default min fee rate, 1000 shannons per kilobyte.
pub const DEFAULT_MIN_FEE_RATE: FeeRate = FeeRate::from_u64(1000);

/// Shannons per 1000 bytes of serialized transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FeeRate(pub u64);

impl FeeRate {
    pub const fn from_u64(fee_rate: u64) -> Self {
        FeeRate(fee_rate)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The fee of a transaction of `size` bytes, rounded up.
    pub fn fee(self, size: usize) -> Result<Capacity> {
        calculate_fee(size as u64, self.0).map(Capacity::shannons)
    }
}

/// `ceil(size * fee_rate / 1000)`.
pub fn calculate_fee(size: u64, fee_rate: u64) -> Result<u64> {
    let product = size
        .checked_mul(fee_rate)
        .ok_or(Error::CapacityOverflow)?;
    Ok(product.div_ceil(KB))
}
