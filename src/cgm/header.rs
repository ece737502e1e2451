//! Command framing for the CGM binary encoding.
//!
//! A command is a header word (class, id, 5-bit length), an optional
//! long-form length word, the parameter octets, and one zero octet when the
//! parameter list has odd length so that the next command starts on a
//! 16-bit boundary.
//!
//! Only single-partition long-form commands are supported. A payload that
//! does not fit one partition is rejected on write, and a continuation flag
//! is rejected on read.

use bytes::{BufMut, BytesMut};
use tracing::trace;

use super::constants::{
    LENGTH_MASK, LONG_FORM, MAX_PARTITION_LEN, MAX_SHORT_FORM_LEN, OPCODE_MASK, PARTITION_FLAG,
    opcode_name,
};
use crate::common::binary::read_u16_be;
use crate::common::error::{Error, Result};

/// Decoded command header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    /// Class and id bits, length field cleared
    pub opcode: u16,
    /// Parameter length in octets as announced by the header
    pub length: usize,
}

impl CommandHeader {
    pub const fn new(opcode: u16, length: usize) -> Self {
        Self {
            opcode: opcode & OPCODE_MASK,
            length,
        }
    }

    /// Whether this header needs the long form.
    #[inline]
    pub const fn is_long_form(&self) -> bool {
        self.length > MAX_SHORT_FORM_LEN
    }

    /// Octets the header itself occupies.
    #[inline]
    pub const fn encoded_len(&self) -> usize {
        if self.is_long_form() { 4 } else { 2 }
    }

    /// Append the header to `buf`.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        if self.length > MAX_PARTITION_LEN {
            return Err(Error::PayloadTooLarge {
                opcode: self.opcode,
                len: self.length,
            });
        }

        if self.is_long_form() {
            trace!(opcode = self.opcode, length = self.length, "long-form header");
            buf.put_u16(self.opcode | LONG_FORM);
            buf.put_u16(self.length as u16);
        } else {
            buf.put_u16(self.opcode | self.length as u16);
        }
        Ok(())
    }

    /// Parse a header at `offset`. Returns the header and the octets consumed.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let word = read_u16_be(data, offset).map_err(|_| Error::Truncated {
            offset,
            needed: 2,
            available: data.len().saturating_sub(offset),
        })?;

        let opcode = word & OPCODE_MASK;
        let short_len = word & LENGTH_MASK;
        if short_len != LONG_FORM {
            return Ok((Self::new(opcode, short_len as usize), 2));
        }

        let long = read_u16_be(data, offset + 2).map_err(|_| Error::Truncated {
            offset: offset + 2,
            needed: 2,
            available: data.len().saturating_sub(offset + 2),
        })?;
        if long & PARTITION_FLAG != 0 {
            return Err(Error::MalformedLength {
                offset: offset + 2,
                reason: format!(
                    "{} continues in another partition; partitioned commands are not supported",
                    opcode_name(opcode).unwrap_or("command")
                ),
            });
        }
        Ok((Self::new(opcode, (long & !PARTITION_FLAG) as usize), 4))
    }
}

/// Number of octets a parameter list of `length` occupies once padded.
#[inline]
pub const fn padded_len(length: usize) -> usize {
    length + (length & 1)
}

/// A fully framed command read from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Stream offset of the header word
    pub offset: usize,
    /// Class and id bits
    pub opcode: u16,
    /// Parameter octets, padding excluded
    pub params: &'a [u8],
}

impl<'a> Record<'a> {
    /// Parse one record at `offset`. Returns the record and the octets consumed,
    /// padding included.
    pub fn parse(data: &'a [u8], offset: usize) -> Result<(Self, usize)> {
        let (header, header_len) = CommandHeader::parse(data, offset)?;
        let start = offset + header_len;
        let end = start + padded_len(header.length);
        if end > data.len() {
            return Err(Error::Truncated {
                offset: start,
                needed: padded_len(header.length),
                available: data.len() - start,
            });
        }

        let record = Self {
            offset,
            opcode: header.opcode,
            params: &data[start..start + header.length],
        };
        Ok((record, end - offset))
    }

    /// Mnemonic of the record's opcode, if it is a known one.
    pub fn name(&self) -> Option<&'static str> {
        opcode_name(self.opcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cgm::constants::op;

    fn encode(opcode: u16, length: usize) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        CommandHeader::new(opcode, length).encode(&mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn test_short_form() {
        assert_eq!(encode(op::MF_VERSION, 2).unwrap(), vec![0x10, 0x22]);
        assert_eq!(encode(op::MF_DESC, 30).unwrap(), vec![0x10, 0x5E]);
    }

    #[test]
    fn test_long_form() {
        assert_eq!(encode(op::MF_DESC, 31).unwrap(), vec![0x10, 0x5F, 0x00, 0x1F]);
        assert_eq!(
            encode(op::LINE, 32765).unwrap(),
            vec![0x40, 0x3F, 0x7F, 0xFD]
        );
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(
            encode(op::POLYGON, 32766),
            Err(Error::PayloadTooLarge { len: 32766, .. })
        ));
    }

    #[test]
    fn test_parse_both_forms() {
        let data = [0x10, 0x22, 0x00, 0x01];
        let (header, used) = CommandHeader::parse(&data, 0).unwrap();
        assert_eq!(header, CommandHeader::new(op::MF_VERSION, 2));
        assert_eq!(used, 2);

        let data = [0x10, 0x5F, 0x00, 0x40];
        let (header, used) = CommandHeader::parse(&data, 0).unwrap();
        assert_eq!(header, CommandHeader::new(op::MF_DESC, 64));
        assert_eq!(used, 4);
    }

    #[test]
    fn test_parse_rejects_partition_flag() {
        let data = [0x10, 0x5F, 0x80, 0x40];
        assert!(matches!(
            CommandHeader::parse(&data, 0),
            Err(Error::MalformedLength { offset: 2, .. })
        ));
    }

    #[test]
    fn test_record_skips_padding() {
        // LineColr, 3 octets + pad, followed by BegPicBody
        let data = [0x50, 0x83, 0x01, 0x02, 0x03, 0x00, 0x00, 0x80];
        let (record, used) = Record::parse(&data, 0).unwrap();
        assert_eq!(record.opcode, op::LINE_COLR);
        assert_eq!(record.params, &[1, 2, 3]);
        assert_eq!(used, 6);
        assert_eq!(record.name(), Some("LineColr"));

        let (record, used) = Record::parse(&data, 6).unwrap();
        assert_eq!(record.opcode, op::BEG_PIC_BODY);
        assert!(record.params.is_empty());
        assert_eq!(used, 2);
    }

    #[test]
    fn test_record_truncated() {
        let data = [0x40, 0x28, 0x00, 0x0A, 0x00];
        assert!(matches!(
            Record::parse(&data, 0),
            Err(Error::Truncated { offset: 2, needed: 8, available: 3 })
        ));
        assert!(matches!(
            Record::parse(&data, 4),
            Err(Error::Truncated { offset: 4, needed: 2, available: 1 })
        ));
    }
}
