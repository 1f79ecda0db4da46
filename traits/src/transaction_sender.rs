use ckb_types::{core::TransactionView, packed::Byte32};

/// Status of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Proposed,
    Committed,
    Rejected(String),
    Unknown,
}

impl TxStatus {
    /// Whether polling again can change the status.
    pub fn is_final(&self) -> bool {
        matches!(self, TxStatus::Committed | TxStatus::Rejected(_))
    }
}

pub trait TransactionSender {
    fn send_transaction(&self, tx: &TransactionView) -> anyhow::Result<Byte32>;

    fn transaction_status(&self, hash: &Byte32) -> anyhow::Result<TxStatus>;
}
