use ckb_types::{bytes::Bytes, packed, prelude::*};

use crate::{
    Codec, CodecError, CodecResult,
    layout::{pack_dynvec, unpack_byte32, unpack_dynvec, verify},
};

/// A value that can sit inside a molecule table.
pub(crate) trait TableField: Sized {
    fn pack_field(&self) -> Vec<u8>;
    fn unpack_field(slice: &[u8]) -> CodecResult<Self>;
}

// Byte32
impl TableField for [u8; 32] {
    fn pack_field(&self) -> Vec<u8> {
        let packed: packed::Byte32 = self.pack();
        packed.as_slice().to_vec()
    }

    fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
        Ok(verify::<packed::Byte32>(slice)?.unpack())
    }
}

// Bytes
impl TableField for Bytes {
    fn pack_field(&self) -> Vec<u8> {
        let packed: packed::Bytes = self.pack();
        packed.as_slice().to_vec()
    }

    fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
        Ok(verify::<packed::Bytes>(slice)?.raw_data())
    }
}

// Bytes holding UTF-8 text
impl TableField for String {
    fn pack_field(&self) -> Vec<u8> {
        let packed: packed::Bytes = self.pack();
        packed.as_slice().to_vec()
    }

    fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
        let raw = verify::<packed::Bytes>(slice)?.raw_data();
        String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

// BytesOpt holding an id
impl TableField for Option<[u8; 32]> {
    fn pack_field(&self) -> Vec<u8> {
        let packed: packed::BytesOpt = self.map(|id| Bytes::copy_from_slice(&id)).pack();
        packed.as_slice().to_vec()
    }

    fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
        verify::<packed::BytesOpt>(slice)?
            .to_opt()
            .map(|id| unpack_byte32(&id.raw_data()))
            .transpose()
    }
}

// Uint32Opt, an option of the packed Uint32
impl TableField for Option<u32> {
    fn pack_field(&self) -> Vec<u8> {
        self.map(|value| {
            let packed: packed::Uint32 = value.pack();
            packed.as_slice().to_vec()
        })
        .unwrap_or_default()
    }

    fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
        if slice.is_empty() {
            return Ok(None);
        }
        Ok(Some(verify::<packed::Uint32>(slice)?.unpack()))
    }
}

// dynvec of tables
impl<T: Codec> TableField for Vec<T> {
    fn pack_field(&self) -> Vec<u8> {
        let items = self.iter().map(Codec::pack).collect::<Vec<_>>();
        let slices = items.iter().map(|item| item.as_ref()).collect::<Vec<_>>();
        pack_dynvec(&slices)
    }

    fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
        unpack_dynvec(slice)?.into_iter().map(T::unpack).collect()
    }
}

macro_rules! impl_table_field_for_entity {
    ($($entity:ident),+ $(,)?) => {
        $(
            impl TableField for packed::$entity {
                fn pack_field(&self) -> Vec<u8> {
                    self.as_slice().to_vec()
                }

                fn unpack_field(slice: &[u8]) -> CodecResult<Self> {
                    verify::<packed::$entity>(slice)
                }
            }
        )+
    };
}

impl_table_field_for_entity!(Script, Transaction, CellOutput);
