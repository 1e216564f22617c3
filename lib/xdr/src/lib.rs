//! RFC 4506 - XDR: External Data Representation Standard
//!
//! https://datatracker.ietf.org/doc/html/rfc4506
//!
//! sFlow is mostly plain XDR, with one exception: the compact data source id packs
//! a one byte type and a three byte index into a single word, so 8 and 24 bit
//! helpers are provided as well.

use std::io::{Error, ErrorKind, Read, Result, Write};
use std::net::{Ipv4Addr, Ipv6Addr};

const PADDING: [u8; 3] = [0; 3];

const U24_MAX: u32 = 0x00FF_FFFF;

/// Round `len` up to the next multiple of 4.
#[inline]
pub const fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

pub trait XDRReader: Read {
    fn read_i8(&mut self) -> Result<i8> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0] as i8)
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads the three byte unsigned field into the low bits of a `u32`.
    fn read_u24(&mut self) -> Result<u32> {
        let mut buf = [0; 3];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let mut buf = [0; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_be_bytes(buf))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_be_bytes(buf))
    }

    /// Reads `len` bytes of opaque data, then consumes the zero padding up to
    /// the next 4 byte boundary.
    ///
    /// The caller is responsible for bounding `len`, the buffer is allocated
    /// before anything is read.
    fn read_opaque(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; padded_len(len)];
        self.read_exact(&mut data)?;
        data.truncate(len);

        Ok(data)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()?;
        let data = self.read_opaque(len as usize)?;

        String::from_utf8(data).map_err(|err| Error::new(ErrorKind::InvalidData, err))
    }
}

impl<T> XDRReader for T where T: Read + ?Sized {}

pub trait XDRWriter: Write {
    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Writes the low three bytes of `value`, fails if the high byte is set.
    fn write_u24(&mut self, value: u32) -> Result<()> {
        if value > U24_MAX {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{value} does not fit in 24 bits"),
            ));
        }

        self.write_all(&value.to_be_bytes()[1..])
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Writes `data` followed by zero padding up to the next 4 byte boundary.
    /// The length is not written, see [`XDRWriter::write_string`] for that.
    fn write_opaque(&mut self, data: &[u8]) -> Result<()> {
        self.write_all(data)?;
        self.write_all(&PADDING[..padded_len(data.len()) - data.len()])
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_u32(s.len() as u32)?;
        self.write_opaque(s.as_bytes())
    }
}

impl<T> XDRWriter for T where T: Write + ?Sized {}

/// A value with a fixed encoded width, so a record made only of `Field`s has a
/// width known at compile time.
pub trait Field: Sized {
    /// Encoded width in bytes, padding included.
    const WIDTH: usize;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self>;

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()>;
}

impl Field for u32 {
    const WIDTH: usize = 4;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        reader.read_u32()
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32(*self)
    }
}

impl Field for i32 {
    const WIDTH: usize = 4;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        reader.read_i32()
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_i32(*self)
    }
}

impl Field for u64 {
    const WIDTH: usize = 8;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        reader.read_u64()
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64(*self)
    }
}

impl Field for f32 {
    const WIDTH: usize = 4;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        reader.read_f32()
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_f32(*self)
    }
}

impl Field for Ipv4Addr {
    const WIDTH: usize = 4;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut octets = [0u8; 4];
        reader.read_exact(&mut octets)?;
        Ok(Ipv4Addr::from(octets))
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.octets())
    }
}

impl Field for Ipv6Addr {
    const WIDTH: usize = 16;

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut octets = [0u8; 16];
        reader.read_exact(&mut octets)?;
        Ok(Ipv6Addr::from(octets))
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.octets())
    }
}

/// Fixed length opaque, e.g. `[u8; 6]` for a MAC address, which takes 8 bytes
/// on the wire.
impl<const N: usize> Field for [u8; N] {
    const WIDTH: usize = padded_len(N);

    fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut data = [0u8; N];
        reader.read_exact(&mut data)?;

        let mut padding = [0u8; 3];
        reader.read_exact(&mut padding[..Self::WIDTH - N])?;

        Ok(data)
    }

    fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_opaque(self)
    }
}
