use std::collections::BTreeMap;

use ckb_spore_error::{CodecError, Error, Result};

/// The parameter listing the mutants a spore runs.
pub const MUTANT_PARAM: &str = "mutant[]";

/// A parameter value of a content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Single(value) => vec![value.as_str()],
            ParamValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// A decoded content type such as `image/png;mutant[]=0x...,0x...`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ContentType {
    pub media_type: String,
    pub params: BTreeMap<String, ParamValue>,
}

impl ContentType {
    /// Ids of the mutants listed in the `mutant[]` parameter.
    pub fn mutant_ids(&self) -> Result<Vec<[u8; 32]>> {
        let Some(value) = self.params.get(MUTANT_PARAM) else {
            return Ok(Vec::new());
        };
        value.values().into_iter().map(parse_id).collect()
    }
}

fn parse_id(text: &str) -> Result<[u8; 32]> {
    let hex = text.trim().trim_start_matches("0x");
    let mut id = [0u8; 32];
    if hex.len() != id.len() * 2 {
        return Err(CodecError::InvalidLength {
            expected: id.len() * 2,
            actual: hex.len(),
        }
        .into());
    }
    faster_hex::hex_decode(hex.as_bytes(), &mut id)
        .map_err(|err| Error::Decode(CodecError::Malformed(format!("{text}: {err}"))))?;
    Ok(id)
}

/// Parses content type text. The grammar (quoting, list parameters) is owned
/// by the implementor.
pub trait ContentTypeDecoder {
    fn decode(&self, text: &str) -> anyhow::Result<ContentType>;
}
