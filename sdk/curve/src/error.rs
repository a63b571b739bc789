use thiserror::Error;

/// Failure to decode a value from hex or from its canonical bytes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("scalar is not a canonical field element")]
    InvalidScalar,

    #[error("bytes do not encode a point in the prime-order subgroup")]
    InvalidPoint,

    #[error("non-canonical compact size prefix")]
    NonCanonicalSize,

    #[error("length {len} exceeds limit {limit}")]
    LengthLimit { len: u64, limit: u64 },

    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("unknown {kind} tag {tag:#04x}")]
    UnknownTag { kind: &'static str, tag: u8 },

    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}
