use ckb_types::bytes::Bytes;

use crate::{CodecError, CodecResult, layout::unpack_byte32};

const ID_SIZE: usize = 32;

/// Width of the minimal payment field in [`DelegationArgs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DelegationArgsVersion {
    /// One byte, used by cluster proxy args.
    V1,
    /// Eight little-endian bytes, used by mutant args.
    V2,
}

impl DelegationArgsVersion {
    pub fn payment_width(self) -> usize {
        match self {
            DelegationArgsVersion::V1 => 1,
            DelegationArgsVersion::V2 => 8,
        }
    }
}

/// Type script args of fee-gated objects: the object's type id, optionally
/// followed by the exponent of the minimal payment (`10^n` shannons) its
/// owner accepts in place of including the object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DelegationArgs {
    pub id: [u8; 32],
    pub min_payment: Option<u64>,
}

impl DelegationArgs {
    pub fn new(id: [u8; 32], min_payment: Option<u64>) -> Self {
        DelegationArgs { id, min_payment }
    }

    pub fn with_id(self, id: [u8; 32]) -> Self {
        DelegationArgs { id, ..self }
    }

    pub fn pack_versioned(&self, version: DelegationArgsVersion) -> CodecResult<Bytes> {
        let width = version.payment_width();
        let mut buf = Vec::with_capacity(ID_SIZE + width);
        buf.extend_from_slice(&self.id);
        if let Some(min_payment) = self.min_payment {
            match version {
                DelegationArgsVersion::V1 => {
                    let exponent = u8::try_from(min_payment).map_err(|_| {
                        CodecError::ValueOverflow {
                            value: min_payment,
                            width,
                        }
                    })?;
                    buf.push(exponent);
                }
                DelegationArgsVersion::V2 => buf.extend_from_slice(&min_payment.to_le_bytes()),
            }
        }
        Ok(buf.into())
    }

    pub fn unpack_versioned(slice: &[u8], version: DelegationArgsVersion) -> CodecResult<Self> {
        let width = version.payment_width();
        if slice.len() != ID_SIZE && slice.len() != ID_SIZE + width {
            return Err(CodecError::InvalidLength {
                expected: ID_SIZE + width,
                actual: slice.len(),
            });
        }
        let id = unpack_byte32(&slice[..ID_SIZE])?;
        let min_payment = match &slice[ID_SIZE..] {
            [] => None,
            [exponent] => Some(u64::from(*exponent)),
            rest => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(rest);
                Some(u64::from_le_bytes(buf))
            }
        };
        Ok(DelegationArgs { id, min_payment })
    }
}
