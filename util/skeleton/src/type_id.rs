use ckb_hash::new_blake2b;
use ckb_spore_error::{Error, Result};
use ckb_types::{bytes::Bytes, packed::CellInput, prelude::*};

use crate::TransactionSkeleton;

/// Written into args until the first input is known.
pub const TYPE_ID_PLACEHOLDER: [u8; 32] = [0u8; 32];

/// `blake2b(first_input ++ output_index as u64 LE)`.
pub fn calculate_type_id(first_input: &CellInput, output_index: u64) -> [u8; 32] {
    let mut blake2b = new_blake2b();
    blake2b.update(first_input.as_slice());
    blake2b.update(&output_index.to_le_bytes());
    let mut ret = [0u8; 32];
    blake2b.finalize(&mut ret);
    ret
}

impl TransactionSkeleton {
    /// The type id of the output at `output_index`, seeded by the first input.
    pub fn type_id(&self, output_index: usize) -> Result<[u8; 32]> {
        if self.inputs().is_empty() {
            return Err(Error::invariant(
                "cannot derive a type id without any input",
            ));
        }
        let first_input = self.cell_input(0)?;
        Ok(calculate_type_id(&first_input, output_index as u64))
    }

    /// Rewrites the type script args of the output at `output_index` with
    /// the args `encode` builds from its type id.
    pub fn write_type_id<F>(self, output_index: usize, encode: F) -> Result<Self>
    where
        F: FnOnce([u8; 32]) -> Result<Bytes>,
    {
        let type_id = self.type_id(output_index)?;
        let output = self.output(output_index)?.clone();
        let type_script = output.type_().ok_or_else(|| {
            Error::invariant(format!("output {output_index} has no type script"))
        })?;
        let type_script = type_script.as_builder().args(encode(type_id)?.pack()).build();
        self.update_output(output_index, output.with_type(Some(type_script)))
    }
}
