use std::collections::BTreeMap;

use ckb_spore_error::ErrorKind;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, ScriptHashType},
    packed,
    prelude::*,
};
use pretty_assertions::assert_eq;

use crate::{Cell, ContentType, MUTANT_PARAM, ParamValue, TxStatus};

fn lock() -> packed::Script {
    packed::Script::new_builder()
        .code_hash([1u8; 32].pack())
        .hash_type(ScriptHashType::Type.into())
        .args(Bytes::from(vec![2u8; 20]).pack())
        .build()
}

fn cell(capacity: u64, data: &'static [u8]) -> Cell {
    let output = packed::CellOutput::new_builder()
        .capacity(Capacity::shannons(capacity).pack())
        .lock(lock())
        .build();
    Cell::new(output, Bytes::from_static(data))
}

#[test]
fn occupied_capacity_counts_lock_and_data() {
    // 8 capacity + 32 code hash + 1 hash type + 20 args + 4 data
    let cell = cell(0, b"spor");
    assert_eq!(
        cell.occupied_capacity().unwrap(),
        Capacity::bytes(65).unwrap()
    );
    assert!(!cell.is_pure_capacity());
}

#[test]
fn margin_is_zero_when_lacking_capacity() {
    let cell = cell(100, b"");
    assert_eq!(cell.capacity_margin().unwrap(), Capacity::zero());

    let minimal = cell.with_minimal_capacity().unwrap();
    assert_eq!(minimal.capacity(), Capacity::bytes(61).unwrap());

    let rich = minimal.with_capacity(Capacity::bytes(100).unwrap());
    assert_eq!(rich.capacity_margin().unwrap(), Capacity::bytes(39).unwrap());
    // an already sufficient capacity is kept
    assert_eq!(
        rich.clone().with_minimal_capacity().unwrap().capacity(),
        rich.capacity()
    );
}

#[test]
fn type_script_is_counted() {
    let cell = cell(0, b"").with_type(Some(lock()));
    assert_eq!(
        cell.occupied_capacity().unwrap(),
        Capacity::bytes(114).unwrap()
    );
    assert_eq!(cell.type_(), Some(lock()));
}

#[test]
fn mutant_ids_from_list_parameter() {
    let first = format!("0x{}", "11".repeat(32));
    let second = "22".repeat(32);
    let mut params = BTreeMap::new();
    params.insert(
        MUTANT_PARAM.to_owned(),
        ParamValue::List(vec![first, second]),
    );
    let content_type = ContentType {
        media_type: "image/png".to_owned(),
        params,
    };
    assert_eq!(
        content_type.mutant_ids().unwrap(),
        vec![[0x11; 32], [0x22; 32]]
    );
}

#[test]
fn mutant_ids_reject_bad_hex() {
    let mut params = BTreeMap::new();
    params.insert(MUTANT_PARAM.to_owned(), ParamValue::Single("0x1234".to_owned()));
    let content_type = ContentType {
        media_type: "text/plain".to_owned(),
        params,
    };
    assert_eq!(content_type.mutant_ids().unwrap_err().kind(), ErrorKind::Decode);

    let plain = ContentType {
        media_type: "text/plain".to_owned(),
        params: BTreeMap::new(),
    };
    assert!(plain.mutant_ids().unwrap().is_empty());
}

#[test]
fn final_statuses() {
    assert!(TxStatus::Committed.is_final());
    assert!(TxStatus::Rejected("dup".to_owned()).is_final());
    assert!(!TxStatus::Pending.is_final());
    assert!(!TxStatus::Unknown.is_final());
}
