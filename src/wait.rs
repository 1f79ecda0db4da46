use std::{thread, time::Duration};

use ckb_logger::{debug, info};
use ckb_spore_error::{Error, Result};
use ckb_spore_traits::{TransactionSender, TxStatus};
use ckb_types::{core::TransactionView, packed::Byte32, prelude::*};

/// Polling bounds of [`wait_for_transaction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitOptions {
    pub max_retries: usize,
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        WaitOptions {
            max_retries: 60,
            interval: Duration::from_secs(3),
        }
    }
}

fn hex_hash(hash: &Byte32) -> String {
    format!("0x{}", faster_hex::hex_string(hash.as_slice()))
}

/// Polls the status of `hash` until it is committed.
///
/// A rejected transaction fails at once; any other status is polled again
/// after `interval`, at most `max_retries` times.
pub fn wait_for_transaction(
    sender: &dyn TransactionSender,
    hash: &Byte32,
    options: WaitOptions,
) -> Result<()> {
    for attempt in 0..=options.max_retries {
        match sender.transaction_status(hash)? {
            TxStatus::Committed => {
                info!("transaction {} committed", hex_hash(hash));
                return Ok(());
            }
            TxStatus::Rejected(reason) => {
                return Err(Error::Rejected {
                    hash: hex_hash(hash),
                    reason,
                });
            }
            status => {
                debug!(
                    "transaction {} is {:?}, attempt {}",
                    hex_hash(hash),
                    status,
                    attempt
                );
                if attempt < options.max_retries && !options.interval.is_zero() {
                    thread::sleep(options.interval);
                }
            }
        }
    }
    Err(Error::Timeout {
        hash: hex_hash(hash),
        retries: options.max_retries,
    })
}

/// Submits `tx` and waits for it to be committed.
pub fn send_and_wait(
    sender: &dyn TransactionSender,
    tx: &TransactionView,
    options: WaitOptions,
) -> Result<Byte32> {
    let hash = sender.send_transaction(tx)?;
    wait_for_transaction(sender, &hash, options)?;
    Ok(hash)
}
