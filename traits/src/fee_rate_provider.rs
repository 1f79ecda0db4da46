pub trait FeeRateProvider {
    /// Minimal fee rate accepted by the transaction pool, in shannons per
    /// 1000 bytes.
    fn min_fee_rate(&self) -> anyhow::Result<u64>;
}
