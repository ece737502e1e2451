//! Binary field utilities for the CGM binary encoding.
//!
//! CGM binary encoding stores every integer as a big-endian, two's-complement
//! 16-bit word, and strings as ISO 8859-1 octets behind a one-octet length.
//! This module provides the readers used by the interpreter and the string
//! conversion shared by both directions.

use zerocopy::{BE, FromBytes, I16, U16};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Read a single octet at the given offset.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> BinaryResult<u8> {
    data.get(offset)
        .copied()
        .ok_or(BinaryError::InsufficientData {
            expected: offset + 1,
            available: data.len(),
        })
}

/// Read a big-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use nitf_cgm::common::binary::read_u16_be;
/// let data = [0x12, 0x34, 0x56, 0x78];
/// assert_eq!(read_u16_be(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_be(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_be(data: &[u8], offset: usize) -> BinaryResult<u16> {
    if offset + 2 > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: offset + 2,
            available: data.len(),
        });
    }
    U16::<BE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a big-endian i16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use nitf_cgm::common::binary::read_i16_be;
/// let data = [0xFF, 0xFE];
/// assert_eq!(read_i16_be(&data, 0).unwrap(), -2i16);
/// ```
#[inline]
pub fn read_i16_be(data: &[u8], offset: usize) -> BinaryResult<i16> {
    if offset + 2 > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: offset + 2,
            available: data.len(),
        });
    }
    I16::<BE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i16".to_string()))
}

/// Read `count` consecutive (x, y) pairs of big-endian i16 starting at `offset`.
pub fn read_i16_pairs(data: &[u8], offset: usize, count: usize) -> BinaryResult<Vec<(i16, i16)>> {
    let end = offset + count * 4;
    if end > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: end,
            available: data.len(),
        });
    }

    let mut pairs = Vec::with_capacity(count);
    let mut pos = offset;
    for _ in 0..count {
        pairs.push((read_i16_be(data, pos)?, read_i16_be(data, pos + 2)?));
        pos += 4;
    }
    Ok(pairs)
}

/// Read a CGM string parameter: one length octet followed by that many octets.
///
/// Returns the decoded string and the number of octets consumed, length
/// octet included.
///
/// # Examples
///
/// ```
/// use nitf_cgm::common::binary::read_cgm_string;
/// let data = [0x03, b'a', b'b', b'c'];
/// assert_eq!(read_cgm_string(&data, 0).unwrap(), ("abc".to_string(), 4));
/// ```
pub fn read_cgm_string(data: &[u8], offset: usize) -> BinaryResult<(String, usize)> {
    let len = read_u8(data, offset)? as usize;
    let start = offset + 1;
    if start + len > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: start + len,
            available: data.len(),
        });
    }
    Ok((parse_latin1_string(&data[start..start + len]), len + 1))
}

/// Decode ISO 8859-1 octets. Every octet maps to the code point of the same value.
#[inline]
pub fn parse_latin1_string(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Encode a string as ISO 8859-1 octets.
///
/// Returns `None` if the string holds a character above U+00FF.
pub fn encode_latin1_string(s: &str) -> Option<Vec<u8>> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}
