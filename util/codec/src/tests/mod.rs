use ckb_types::{bytes::Bytes, core::ScriptHashType, packed, prelude::*};

mod layout;

fn hex(slice: &[u8]) -> String {
    faster_hex::hex_string(slice)
}

fn lock_script(seed: u8) -> packed::Script {
    packed::Script::new_builder()
        .code_hash([seed; 32].pack())
        .hash_type(ScriptHashType::Type.into())
        .args(Bytes::from(vec![seed; 20]).pack())
        .build()
}
