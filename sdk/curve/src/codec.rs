//! Canonical byte encoding
//!
//! Every wire value implements [`Encode`] and [`Decode`]. Integers are
//! little-endian; variable-length data is prefixed with a Bitcoin-style
//! compact size:
//!
//! ```text
//! value < 0xfd          -> [value]
//! value <= 0xffff       -> [0xfd, u16]
//! value <= 0xffff_ffff  -> [0xfe, u32]
//! otherwise             -> [0xff, u64]
//! ```
//!
//! Decoding is strict: non-minimal size prefixes and trailing bytes are
//! rejected so that `encode(decode(b)) == b` for every accepted `b`.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::EncodingError;

/// Upper bound for any length prefix (element or byte count).
pub const MAX_LENGTH: u64 = 0x0200_0000;

/// Append-only byte sink.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        let mut b = [0u8; 2];
        LittleEndian::write_u16(&mut b, v);
        self.write_bytes(&b);
    }

    pub fn write_u32(&mut self, v: u32) {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, v);
        self.write_bytes(&b);
    }

    pub fn write_i32(&mut self, v: i32) {
        let mut b = [0u8; 4];
        LittleEndian::write_i32(&mut b, v);
        self.write_bytes(&b);
    }

    pub fn write_u64(&mut self, v: u64) {
        let mut b = [0u8; 8];
        LittleEndian::write_u64(&mut b, v);
        self.write_bytes(&b);
    }

    pub fn write_compact_size(&mut self, v: u64) {
        match v {
            0..=0xfc => self.write_u8(v as u8),
            0xfd..=0xffff => {
                self.write_u8(0xfd);
                self.write_u16(v as u16);
            }
            0x1_0000..=0xffff_ffff => {
                self.write_u8(0xfe);
                self.write_u32(v as u32);
            }
            _ => {
                self.write_u8(0xff);
                self.write_u64(v);
            }
        }
    }

    /// Length-prefixed byte string.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_compact_size(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    /// Length-prefixed sequence of encodable values.
    pub fn write_vec<T: Encode>(&mut self, items: &[T]) {
        self.write_compact_size(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }
}

/// Cursor over an input buffer.
pub struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
}

fn eof(_: std::io::Error) -> EncodingError {
    EncodingError::UnexpectedEof
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    pub fn remaining(&self) -> usize {
        let total = self.cursor.get_ref().len() as u64;
        total.saturating_sub(self.cursor.position()) as usize
    }

    /// Ensure the whole input has been consumed.
    pub fn finish(self) -> Result<(), EncodingError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(EncodingError::TrailingBytes(n)),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, EncodingError> {
        self.cursor.read_u8().map_err(eof)
    }

    pub fn read_bool(&mut self) -> Result<bool, EncodingError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(EncodingError::UnknownTag { kind: "bool", tag }),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, EncodingError> {
        self.cursor.read_u16::<LittleEndian>().map_err(eof)
    }

    pub fn read_u32(&mut self) -> Result<u32, EncodingError> {
        self.cursor.read_u32::<LittleEndian>().map_err(eof)
    }

    pub fn read_i32(&mut self) -> Result<i32, EncodingError> {
        self.cursor.read_i32::<LittleEndian>().map_err(eof)
    }

    pub fn read_u64(&mut self) -> Result<u64, EncodingError> {
        self.cursor.read_u64::<LittleEndian>().map_err(eof)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], EncodingError> {
        let mut out = [0u8; N];
        self.cursor.read_exact(&mut out).map_err(eof)?;
        Ok(out)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, EncodingError> {
        if len > self.remaining() {
            return Err(EncodingError::UnexpectedEof);
        }
        let mut out = vec![0u8; len];
        self.cursor.read_exact(&mut out).map_err(eof)?;
        Ok(out)
    }

    pub fn read_compact_size(&mut self) -> Result<u64, EncodingError> {
        let v = match self.read_u8()? {
            0xfd => {
                let v = self.read_u16()? as u64;
                if v < 0xfd {
                    return Err(EncodingError::NonCanonicalSize);
                }
                v
            }
            0xfe => {
                let v = self.read_u32()? as u64;
                if v <= 0xffff {
                    return Err(EncodingError::NonCanonicalSize);
                }
                v
            }
            0xff => {
                let v = self.read_u64()?;
                if v <= 0xffff_ffff {
                    return Err(EncodingError::NonCanonicalSize);
                }
                v
            }
            small => small as u64,
        };
        Ok(v)
    }

    /// Compact size bounded by `limit`.
    pub fn read_length(&mut self, limit: u64) -> Result<usize, EncodingError> {
        let len = self.read_compact_size()?;
        if len > limit {
            return Err(EncodingError::LengthLimit { len, limit });
        }
        Ok(len as usize)
    }

    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, EncodingError> {
        let len = self.read_length(MAX_LENGTH)?;
        self.read_bytes(len)
    }

    pub fn read_vec<T: Decode>(&mut self) -> Result<Vec<T>, EncodingError> {
        let len = self.read_length(MAX_LENGTH)?;
        // Each element takes at least one byte.
        if len > self.remaining() {
            return Err(EncodingError::UnexpectedEof);
        }
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}

pub trait Encode {
    fn encode(&self, w: &mut Writer);

    /// Canonical byte form.
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.encode(&mut w);
        w.into_inner()
    }
}

pub trait Decode: Sized {
    /// Exact encoded width for fixed-size values.
    const FIXED_SIZE: Option<usize> = None;

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError>;

    /// Decode a complete buffer, rejecting trailing bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        if let Some(expected) = Self::FIXED_SIZE {
            if bytes.len() != expected {
                return Err(EncodingError::InvalidLength {
                    expected,
                    got: bytes.len(),
                });
            }
        }
        let mut r = Reader::new(bytes);
        let value = Self::decode(&mut r)?;
        r.finish()?;
        Ok(value)
    }
}

/// Hex (de)serialization for every canonically encoded value.
pub trait HexCodec: Encode + Decode {
    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn from_hex(s: &str) -> Result<Self, EncodingError> {
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl<T: Encode + Decode> HexCodec for T {}

impl Encode for u64 {
    fn encode(&self, w: &mut Writer) {
        w.write_u64(*self);
    }
}

impl Decode for u64 {
    const FIXED_SIZE: Option<usize> = Some(8);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        r.read_u64()
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, w: &mut Writer) {
        w.write_var_bytes(self);
    }
}

impl Decode for Vec<u8> {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        r.read_var_bytes()
    }
}

impl Encode for String {
    fn encode(&self, w: &mut Writer) {
        w.write_var_bytes(self.as_bytes());
    }
}

impl Decode for String {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        String::from_utf8(r.read_var_bytes()?).map_err(|_| EncodingError::InvalidUtf8)
    }
}

/// Implement `serde` for a [`HexCodec`] type as a hex string.
#[macro_export]
macro_rules! impl_hex_serde {
    ($ty:ty) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&$crate::HexCodec::to_hex(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::HexCodec>::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(v: u64) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_compact_size(v);
        w.into_inner()
    }

    #[test]
    fn test_compact_size_widths() {
        assert_eq!(compact(0), vec![0]);
        assert_eq!(compact(0xfc), vec![0xfc]);
        assert_eq!(compact(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(compact(0x1_0000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(compact(u64::MAX).len(), 9);
    }

    #[test]
    fn test_compact_size_rejects_non_minimal() {
        let mut r = Reader::new(&[0xfd, 0x10, 0x00]);
        assert_eq!(r.read_compact_size(), Err(EncodingError::NonCanonicalSize));

        let mut r = Reader::new(&[0xfe, 0xff, 0xff, 0x00, 0x00]);
        assert_eq!(r.read_compact_size(), Err(EncodingError::NonCanonicalSize));
    }

    #[test]
    fn test_reader_eof_and_trailing() {
        let mut r = Reader::new(&[1, 2, 3]);
        assert_eq!(r.read_u32(), Err(EncodingError::UnexpectedEof));

        assert_eq!(
            u64::from_bytes(&[0u8; 9]),
            Err(EncodingError::InvalidLength { expected: 8, got: 9 })
        );
        assert_eq!(
            String::from_bytes(&[1, b'a', 0]),
            Err(EncodingError::TrailingBytes(1))
        );
    }

    #[test]
    fn test_var_bytes_length_exceeds_input() {
        // Claims 200 bytes, provides 2.
        assert_eq!(
            Vec::<u8>::from_bytes(&[200, 1, 2]),
            Err(EncodingError::UnexpectedEof)
        );
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        assert_eq!(
            String::from_bytes(&[2, 0xc3, 0x28]),
            Err(EncodingError::InvalidUtf8)
        );
    }

    #[test]
    fn test_hex_odd_length() {
        assert!(matches!(
            u64::from_hex("abc"),
            Err(EncodingError::Hex(hex::FromHexError::OddLength))
        ));
        assert_eq!(u64::from_hex(&42u64.to_hex()).unwrap(), 42);
    }
}
