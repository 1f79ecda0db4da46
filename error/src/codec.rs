use thiserror::Error;

/// Failures met while packing or unpacking molecule encoded payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The slice is too short to hold the header it declares.
    #[error("header is broken: expected at least {expected} bytes, got {actual}")]
    HeaderIsBroken { expected: usize, actual: usize },
    /// The declared total size disagrees with the slice length.
    #[error("total size {expected} does not match slice length {actual}")]
    TotalSizeNotMatch { expected: usize, actual: usize },
    /// Offsets are unaligned, too small or decreasing.
    #[error("offsets do not match")]
    OffsetsNotMatch,
    /// The table carries a different number of fields.
    #[error("field count {actual} does not match, expected {expected}")]
    FieldCountNotMatch { expected: usize, actual: usize },
    /// A fixed size value has the wrong length.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    /// The union item id is not known.
    #[error("unknown union item {0:#x}")]
    UnknownItem(u32),
    /// A text field is not valid UTF-8.
    #[error("text field is not valid utf-8")]
    InvalidUtf8,
    /// A value does not fit into the width of the selected layout.
    #[error("value {value} does not fit into {width} bytes")]
    ValueOverflow { value: u64, width: usize },
    /// A nested ledger entity failed its own verification.
    #[error("malformed entity: {0}")]
    Malformed(String),
}
