//! Molecule layout primitives.
//!
//! A `table` and a `dynvec` share one layout: a 4-byte little-endian total
//! size, one 4-byte offset per item measured from the start of the buffer,
//! then the items in order. A `union` is a 4-byte item id followed by the
//! item. Leaf values such as `Bytes`, `BytesOpt` or `Byte32` are the packed
//! entities of `ckb-types` and are verified through [`verify`].

use ckb_spore_error::CodecError;
use ckb_types::prelude::Entity;
use molecule::{NUMBER_SIZE, error::VerificationError, pack_number};

/// A specialized `Result` for layout operations.
pub type CodecResult<T> = Result<T, CodecError>;

pub(crate) fn read_number(slice: &[u8]) -> CodecResult<u32> {
    let head = slice
        .get(..NUMBER_SIZE)
        .ok_or(CodecError::HeaderIsBroken {
            expected: NUMBER_SIZE,
            actual: slice.len(),
        })?;
    let mut buf = [0u8; NUMBER_SIZE];
    buf.copy_from_slice(head);
    Ok(u32::from_le_bytes(buf))
}

fn from_verification(err: VerificationError) -> CodecError {
    match err {
        VerificationError::TotalSizeNotMatch(_, expected, actual) => {
            CodecError::TotalSizeNotMatch { expected, actual }
        }
        VerificationError::HeaderIsBroken(_, expected, actual) => {
            CodecError::HeaderIsBroken { expected, actual }
        }
        VerificationError::OffsetsNotMatch(_) => CodecError::OffsetsNotMatch,
        other => CodecError::Malformed(other.to_string()),
    }
}

/// Verifies `slice` as the packed entity `T`.
pub fn verify<T: Entity>(slice: &[u8]) -> CodecResult<T> {
    T::from_slice(slice).map_err(from_verification)
}

/// Serializes items with the shared `table` / `dynvec` header.
pub fn pack_table(items: &[&[u8]]) -> Vec<u8> {
    let header_size = NUMBER_SIZE * (items.len() + 1);
    let total_size = header_size + items.iter().map(|item| item.len()).sum::<usize>();
    let mut buf = Vec::with_capacity(total_size);
    buf.extend_from_slice(&pack_number(total_size as u32));
    let mut offset = header_size;
    for item in items {
        buf.extend_from_slice(&pack_number(offset as u32));
        offset += item.len();
    }
    for item in items {
        buf.extend_from_slice(item);
    }
    buf
}

/// Alias of [`pack_table`] for vectors of dynamically sized items.
pub fn pack_dynvec(items: &[&[u8]]) -> Vec<u8> {
    pack_table(items)
}

/// Splits a `dynvec` into its items.
pub fn unpack_dynvec(slice: &[u8]) -> CodecResult<Vec<&[u8]>> {
    let len = slice.len();
    if len < NUMBER_SIZE {
        return Err(CodecError::HeaderIsBroken {
            expected: NUMBER_SIZE,
            actual: len,
        });
    }
    let total_size = read_number(slice)? as usize;
    if len != total_size {
        return Err(CodecError::TotalSizeNotMatch {
            expected: total_size,
            actual: len,
        });
    }
    if len == NUMBER_SIZE {
        return Ok(Vec::new());
    }
    if len < NUMBER_SIZE * 2 {
        return Err(CodecError::HeaderIsBroken {
            expected: NUMBER_SIZE * 2,
            actual: len,
        });
    }
    let first_offset = read_number(&slice[NUMBER_SIZE..])? as usize;
    if first_offset % NUMBER_SIZE != 0 || first_offset < NUMBER_SIZE * 2 {
        return Err(CodecError::OffsetsNotMatch);
    }
    if len < first_offset {
        return Err(CodecError::HeaderIsBroken {
            expected: first_offset,
            actual: len,
        });
    }
    let item_count = first_offset / NUMBER_SIZE - 1;
    let mut offsets = (1..=item_count)
        .map(|index| {
            read_number(&slice[index * NUMBER_SIZE..]).map(|offset| offset as usize)
        })
        .collect::<CodecResult<Vec<_>>>()?;
    offsets.push(total_size);
    if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(CodecError::OffsetsNotMatch);
    }
    Ok(offsets
        .windows(2)
        .map(|pair| &slice[pair[0]..pair[1]])
        .collect())
}

/// Splits a `table` into its fields.
///
/// In compatible mode a table written by a newer schema may carry extra
/// trailing fields, which are returned but ignored by the caller.
pub fn unpack_table(
    slice: &[u8],
    field_count: usize,
    compatible: bool,
) -> CodecResult<Vec<&[u8]>> {
    let fields = unpack_dynvec(slice)?;
    if fields.len() < field_count || (!compatible && fields.len() > field_count) {
        return Err(CodecError::FieldCountNotMatch {
            expected: field_count,
            actual: fields.len(),
        });
    }
    Ok(fields)
}

/// Serializes one item of a `union`.
pub fn pack_union(item_id: u32, item: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(NUMBER_SIZE + item.len());
    buf.extend_from_slice(&pack_number(item_id));
    buf.extend_from_slice(item);
    buf
}

/// Returns the item id and the item of a `union`.
pub fn unpack_union(slice: &[u8]) -> CodecResult<(u32, &[u8])> {
    Ok((read_number(slice)?, &slice[NUMBER_SIZE..]))
}

pub fn unpack_byte32(slice: &[u8]) -> CodecResult<[u8; 32]> {
    let mut buf = [0u8; 32];
    if slice.len() != buf.len() {
        return Err(CodecError::InvalidLength {
            expected: buf.len(),
            actual: slice.len(),
        });
    }
    buf.copy_from_slice(slice);
    Ok(buf)
}
