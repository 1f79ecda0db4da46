//! Underlying error types used over the spore crates.

use std::fmt;

use derive_more::Display;
use thiserror::Error;

mod codec;
mod convert;
#[cfg(test)]
mod tests;

pub use codec::CodecError;

/// A list specifying categories of spore error.
///
/// It is used with [`Error::kind`] so callers can branch on the category
/// without destructuring the payload of each variant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display)]
pub enum ErrorKind {
    /// A referenced cell or object is absent or not live.
    NotFound,
    /// A script identity is not recognized by the active configuration.
    UnsupportedVersion,
    /// A referenced cell does not carry the expected kind of script.
    InvalidReference,
    /// Collected funds or a capacity margin fall short of the requirement.
    InsufficientCapacity,
    /// An explicit payment is below the computed minimum.
    InsufficientPayment,
    /// The assembled transaction exceeds the configured size budget.
    SizeExceeded,
    /// Malformed bytes were met while unpacking a payload.
    Decode,
    /// An internal precondition of the assembly pipeline does not hold.
    InvariantViolation,
    /// Capacity arithmetic overflowed or underflowed.
    CapacityOverflow,
    /// The configuration could not be parsed.
    Config,
    /// An external collaborator (RPC, indexer, content type decoder) failed.
    Provider,
    /// The ledger rejected a submitted transaction.
    Rejected,
    /// A bounded wait gave up before reaching a terminal status.
    Timeout,
}

/// Top-level spore error type.
#[derive(Error, Debug)]
pub enum Error {
    /// See [`ErrorKind::NotFound`].
    #[error("not found: {0}")]
    NotFound(String),
    /// See [`ErrorKind::UnsupportedVersion`].
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
    /// See [`ErrorKind::InvalidReference`].
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    /// See [`ErrorKind::InsufficientCapacity`].
    #[error("insufficient capacity: required {required} shannons, available {available}")]
    InsufficientCapacity {
        /// Shannons the operation requires.
        required: u64,
        /// Shannons that could be gathered.
        available: u64,
    },
    /// See [`ErrorKind::InsufficientPayment`].
    #[error("insufficient payment: required {required} shannons, provided {provided}")]
    InsufficientPayment {
        /// The computed minimal payment.
        required: u64,
        /// The payment supplied by the caller.
        provided: u64,
    },
    /// See [`ErrorKind::SizeExceeded`].
    #[error("transaction size {size} exceeds the limit {limit}")]
    SizeExceeded {
        /// Serialized size of the assembled transaction.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// See [`ErrorKind::Decode`].
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),
    /// See [`ErrorKind::InvariantViolation`].
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// See [`ErrorKind::CapacityOverflow`].
    #[error("capacity overflow")]
    CapacityOverflow,
    /// See [`ErrorKind::Config`].
    #[error("config error: {0}")]
    Config(String),
    /// See [`ErrorKind::Provider`].
    #[error("provider error: {0}")]
    Provider(anyhow::Error),
    /// See [`ErrorKind::Rejected`].
    #[error("transaction {hash} rejected: {reason}")]
    Rejected {
        /// Hex encoded transaction hash.
        hash: String,
        /// Reason reported by the ledger.
        reason: String,
    },
    /// See [`ErrorKind::Timeout`].
    #[error("gave up waiting for transaction {hash} after {retries} retries")]
    Timeout {
        /// Hex encoded transaction hash.
        hash: String,
        /// How many times the status was polled.
        retries: usize,
    },
}

/// A specialized `Result` for spore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            Error::InvalidReference(_) => ErrorKind::InvalidReference,
            Error::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            Error::InsufficientPayment { .. } => ErrorKind::InsufficientPayment,
            Error::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            Error::Decode(_) => ErrorKind::Decode,
            Error::InvariantViolation(_) => ErrorKind::InvariantViolation,
            Error::CapacityOverflow => ErrorKind::CapacityOverflow,
            Error::Config(_) => ErrorKind::Config,
            Error::Provider(_) => ErrorKind::Provider,
            Error::Rejected { .. } => ErrorKind::Rejected,
            Error::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn not_found<T: fmt::Display>(inner: T) -> Self {
        Error::NotFound(inner.to_string())
    }

    pub fn unsupported<T: fmt::Display>(inner: T) -> Self {
        Error::UnsupportedVersion(inner.to_string())
    }

    pub fn invalid_reference<T: fmt::Display>(inner: T) -> Self {
        Error::InvalidReference(inner.to_string())
    }

    pub fn invariant<T: fmt::Display>(inner: T) -> Self {
        Error::InvariantViolation(inner.to_string())
    }
}
