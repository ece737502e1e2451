//! Parameter list assembly for outgoing commands.
//!
//! A [`Command`] collects the parameter octets of one element in a
//! [`BytesMut`] and frames them with [`CommandHeader`] only when
//! [`Command::finish`] is called, so a command that fails validation never
//! leaves a partial header behind.
//!
//! Most commands announce exactly the octets they carry. String-bearing
//! commands fold their trailing pad octet into the announced length, and the
//! colour commands announce three octets while a fourth (zero) octet follows.

use bytes::{BufMut, BytesMut};
use smallvec::SmallVec;

use super::header::CommandHeader;
use crate::common::binary::encode_latin1_string;
use crate::common::error::{Error, Result};
use crate::common::{Point, RGBColor};

/// Parameter octets of a colour value.
const COLOUR_LEN: usize = 3;

/// Longest string a one-octet length prefix can describe.
pub const MAX_STRING_LEN: usize = 255;

/// A fixed-length run of short parameters. Every such run in the profile
/// (extents, orientation vectors, element lists, radius plus close type)
/// holds at most four values and stays inline.
pub type ShortParams = SmallVec<[i16; 4]>;

/// One command under construction.
#[derive(Debug)]
pub struct Command {
    name: &'static str,
    opcode: u16,
    body: BytesMut,
    /// Overrides the announced length when it differs from the body length
    announced: Option<usize>,
}

impl Command {
    pub fn new(name: &'static str, opcode: u16) -> Self {
        Self {
            name,
            opcode,
            body: BytesMut::with_capacity(16),
            announced: None,
        }
    }

    /// Mnemonic used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// One signed 16-bit parameter.
    pub fn short(mut self, value: i16) -> Self {
        self.body.put_i16(value);
        self
    }

    /// A fixed-length run of signed 16-bit parameters.
    pub fn shorts(mut self, values: ShortParams) -> Self {
        for v in values {
            self.body.put_i16(v);
        }
        self
    }

    /// One point as an (x, y) pair.
    pub fn point(mut self, p: Point) -> Self {
        self.body.put_i16(p.x);
        self.body.put_i16(p.y);
        self
    }

    /// A run of points.
    pub fn points(mut self, points: &[Point]) -> Self {
        for p in points {
            self.body.put_i16(p.x);
            self.body.put_i16(p.y);
        }
        self
    }

    /// One string parameter: length octet, ISO 8859-1 octets, and a pad octet
    /// counted in the announced length when the total would be odd.
    pub fn string(mut self, s: &str) -> Result<Self> {
        self.put_string(s)?;
        self.pad_counted();
        Ok(self)
    }

    /// Several string parameters back to back, padded once at the end.
    pub fn strings<S: AsRef<str>>(mut self, list: &[S]) -> Result<Self> {
        for s in list {
            self.put_string(s.as_ref())?;
        }
        self.pad_counted();
        Ok(self)
    }

    /// Text primitive parameters: anchor, final flag, then the string.
    pub fn text(mut self, at: Point, flag: i16, s: &str) -> Result<Self> {
        self.body.put_i16(at.x);
        self.body.put_i16(at.y);
        self.body.put_i16(flag);
        self.put_string(s)?;
        self.pad_counted();
        Ok(self)
    }

    /// Direct colour from components. Three octets are announced, the fourth
    /// octet is the frame pad.
    pub fn rgb(mut self, colour: RGBColor) -> Self {
        self.body.put_u8(colour.r);
        self.body.put_u8(colour.g);
        self.body.put_u8(colour.b);
        self.body.put_u8(0);
        self.announced = Some(COLOUR_LEN);
        self
    }

    /// Direct colour from a packed `0xAARRGGBB` value, written as one 32-bit
    /// word shifted left by eight so that the low octet doubles as the pad.
    pub fn argb(mut self, argb: u32) -> Self {
        self.body.put_u32(argb << 8);
        self.announced = Some(COLOUR_LEN);
        self
    }

    /// Frame the command and return its full encoding.
    pub fn finish(self) -> Result<BytesMut> {
        let length = self.announced.unwrap_or(self.body.len());
        let header = CommandHeader::new(self.opcode, length);

        let mut out = BytesMut::with_capacity(header.encoded_len() + self.body.len() + 1);
        header.encode(&mut out)?;
        out.extend_from_slice(&self.body);
        if self.body.len() % 2 == 1 {
            out.put_u8(0);
        }
        Ok(out)
    }

    fn put_string(&mut self, s: &str) -> Result<()> {
        let bytes = encode_latin1_string(s).ok_or_else(|| Error::InvalidParameter {
            command: self.name,
            reason: format!("{s:?} is not representable in ISO 8859-1"),
        })?;
        if bytes.len() > MAX_STRING_LEN {
            return Err(Error::InvalidParameter {
                command: self.name,
                reason: format!(
                    "string of {} octets exceeds {} octet limit",
                    bytes.len(),
                    MAX_STRING_LEN
                ),
            });
        }
        self.body.put_u8(bytes.len() as u8);
        self.body.extend_from_slice(&bytes);
        Ok(())
    }

    fn pad_counted(&mut self) {
        if self.body.len() % 2 == 1 {
            self.body.put_u8(0);
        }
    }
}
