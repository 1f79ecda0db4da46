use pretty_assertions::assert_eq;
use proptest::prelude::*;

use ckb_types::{bytes::Bytes, packed, prelude::*};

use crate::{
    CodecError,
    field::TableField,
    layout::{
        pack_dynvec, pack_table, pack_union, read_number, unpack_dynvec, unpack_table,
        unpack_union,
    },
};

#[test]
fn empty_dynvec_is_its_header() {
    let packed = pack_dynvec(&[]);
    assert_eq!(packed, vec![4, 0, 0, 0]);
    assert!(unpack_dynvec(&packed).unwrap().is_empty());
}

#[test]
fn table_offsets_start_after_header() {
    let packed = pack_table(&[b"ab", b"", b"cde"]);
    assert_eq!(
        packed,
        vec![
            21, 0, 0, 0, 16, 0, 0, 0, 18, 0, 0, 0, 18, 0, 0, 0, b'a', b'b', b'c', b'd', b'e'
        ]
    );
    let fields = unpack_table(&packed, 3, false).unwrap();
    assert_eq!(fields, vec![&b"ab"[..], &b""[..], &b"cde"[..]]);
}

#[test]
fn truncated_header_is_rejected() {
    assert_eq!(
        unpack_dynvec(&[1, 0]),
        Err(CodecError::HeaderIsBroken {
            expected: 4,
            actual: 2
        })
    );
}

#[test]
fn total_size_must_match_buffer() {
    let mut packed = pack_table(&[b"ab"]);
    packed.push(0);
    assert_eq!(
        unpack_dynvec(&packed),
        Err(CodecError::TotalSizeNotMatch {
            expected: 10,
            actual: 11
        })
    );
}

#[test]
fn decreasing_offsets_are_rejected() {
    let mut packed = pack_table(&[b"ab", b"cd"]);
    // second offset points before the first
    packed[8] = 11;
    assert_eq!(unpack_dynvec(&packed), Err(CodecError::OffsetsNotMatch));

    let mut misaligned = pack_table(&[b"ab"]);
    misaligned[4] = 7;
    assert_eq!(unpack_dynvec(&misaligned), Err(CodecError::OffsetsNotMatch));
}

#[test]
fn field_count_is_strict_unless_compatible() {
    let packed = pack_table(&[b"a", b"b", b"c"]);
    assert_eq!(
        unpack_table(&packed, 2, false),
        Err(CodecError::FieldCountNotMatch {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(unpack_table(&packed, 2, true).unwrap().len(), 3);
    assert_eq!(
        unpack_table(&packed, 4, true),
        Err(CodecError::FieldCountNotMatch {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn bytes_field_is_a_packed_fixvec() {
    let raw = Bytes::from_static(b"hi");
    let packed: packed::Bytes = raw.pack();
    assert_eq!(raw.pack_field(), packed.as_slice().to_vec());
    assert_eq!(raw.pack_field(), vec![2, 0, 0, 0, b'h', b'i']);
    assert_eq!(
        Bytes::unpack_field(&[3, 0, 0, 0, b'h', b'i']),
        Err(CodecError::TotalSizeNotMatch {
            expected: 7,
            actual: 6
        })
    );
    assert_eq!(
        String::unpack_field(&Bytes::from_static(&[0xff, 0xfe]).pack_field()),
        Err(CodecError::InvalidUtf8)
    );
}

#[test]
fn optional_fields() {
    assert!(None::<[u8; 32]>.pack_field().is_empty());
    assert_eq!(<Option<[u8; 32]>>::unpack_field(&[]), Ok(None));
    let id = [7u8; 32];
    let packed = Some(id).pack_field();
    assert_eq!(packed.len(), 4 + 32);
    assert_eq!(<Option<[u8; 32]>>::unpack_field(&packed), Ok(Some(id)));

    assert_eq!(Some(9u32).pack_field(), vec![9, 0, 0, 0]);
    assert_eq!(<Option<u32>>::unpack_field(&[9, 0, 0, 0]), Ok(Some(9)));
    assert_eq!(
        <Option<u32>>::unpack_field(&[9, 0]),
        Err(CodecError::TotalSizeNotMatch {
            expected: 4,
            actual: 2
        })
    );
}

#[test]
fn union_needs_an_item_id() {
    let packed = pack_union(7, b"x");
    assert_eq!(unpack_union(&packed).unwrap(), (7, &b"x"[..]));
    assert_eq!(
        unpack_union(&[1, 0, 0]),
        Err(CodecError::HeaderIsBroken {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn short_number_is_an_error() {
    assert_eq!(read_number(&[1, 0, 0, 0, 9]), Ok(1));
    assert_eq!(
        read_number(&[1, 0]),
        Err(CodecError::HeaderIsBroken {
            expected: 4,
            actual: 2
        })
    );
}

proptest! {
    #[test]
    fn dynvec_preserves_items(
        items in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..8)
    ) {
        let slices = items.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let packed = pack_dynvec(&slices);
        let unpacked = unpack_dynvec(&packed).unwrap();
        prop_assert_eq!(unpacked, slices);
    }

    #[test]
    fn arbitrary_bytes_never_panic(raw in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = unpack_dynvec(&raw);
        let _ = Bytes::unpack_field(&raw);
        let _ = <Option<[u8; 32]>>::unpack_field(&raw);
        let _ = unpack_union(&raw);
    }
}
