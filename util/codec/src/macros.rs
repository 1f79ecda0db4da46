/// Implements the field trait for records that already implement `Codec`,
/// so they can be nested inside other tables.
macro_rules! impl_table_field {
    ($($name:ty),+ $(,)?) => {
        $(
            impl $crate::field::TableField for $name {
                fn pack_field(&self) -> Vec<u8> {
                    $crate::Codec::pack(self).to_vec()
                }

                fn unpack_field(slice: &[u8]) -> $crate::CodecResult<Self> {
                    <$name as $crate::Codec>::unpack(slice)
                }
            }
        )+
    };
}

/// Declares a record serialized as a molecule `table`, one field per struct
/// member in declaration order.
macro_rules! table_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$field_meta:meta])* pub $field:ident: $ty:ty, )+
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )+
        }

        impl $crate::Codec for $name {
            fn pack(&self) -> ::ckb_types::bytes::Bytes {
                use $crate::field::TableField;
                let fields = [$( self.$field.pack_field() ),+];
                let slices = fields.iter().map(Vec::as_slice).collect::<Vec<_>>();
                $crate::layout::pack_table(&slices).into()
            }

            fn unpack(slice: &[u8]) -> $crate::CodecResult<Self> {
                use $crate::field::TableField;
                let names = [$( stringify!($field) ),+];
                let fields = $crate::layout::unpack_table(slice, names.len(), false)?;
                let mut fields = fields.into_iter();
                Ok($name {
                    $(
                        $field: <$ty as TableField>::unpack_field(fields.next().ok_or(
                            $crate::CodecError::FieldCountNotMatch {
                                expected: names.len(),
                                actual: 0,
                            },
                        )?)?,
                    )+
                })
            }
        }

        impl_table_field!($name);
    };
}
