//! The cell value type and the ledger collaborators spore assembly relies on.
//!
//! The collaborators are synchronous; an async RPC client is expected to be
//! driven by the caller and wrapped behind these traits.
mod cell;
mod cell_provider;
mod content_type;
mod fee_rate_provider;
#[cfg(test)]
mod tests;
mod transaction_sender;

pub use crate::cell::Cell;
pub use crate::cell_provider::{CellIndexer, CellProvider, CellStatus};
pub use crate::content_type::{ContentType, ContentTypeDecoder, MUTANT_PARAM, ParamValue};
pub use crate::fee_rate_provider::FeeRateProvider;
pub use crate::transaction_sender::{TransactionSender, TxStatus};
