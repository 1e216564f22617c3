//! Framing shared by samples and records: a 4 byte format, a 4 byte length
//! and exactly `length` bytes of payload.

use std::io::{Cursor, Write};

use bytes::{Buf, BufMut, BytesMut};
use xdr::{XDRReader, XDRWriter};

use crate::Error;

/// Reads the format and length words of a TLV header.
pub(crate) fn read_header(buf: &mut Cursor<&[u8]>) -> Result<(u32, u32), Error> {
    let format = buf.read_u32()?;
    let length = buf.read_u32()?;

    Ok((format, length))
}

/// Splits the next `length` bytes off `buf`. The returned slice is the only
/// thing a payload decoder gets to see, so it can never read into the next
/// entry.
pub(crate) fn take<'a>(
    buf: &mut Cursor<&'a [u8]>,
    what: &'static str,
    length: u32,
) -> Result<&'a [u8], Error> {
    let available = buf.remaining();
    if length as usize > available {
        return Err(Error::Truncated {
            what,
            declared: length,
            available,
        });
    }

    let data: &'a [u8] = *buf.get_ref();
    let start = buf.position() as usize;
    buf.advance(length as usize);

    Ok(&data[start..start + length as usize])
}

/// Checks that a payload decoder consumed its whole slice.
pub(crate) fn finish(buf: &Cursor<&[u8]>, what: &'static str) -> Result<(), Error> {
    if buf.has_remaining() {
        return Err(Error::LengthMismatch {
            what,
            declared: buf.get_ref().len() as u32,
            consumed: buf.position(),
        });
    }

    Ok(())
}

/// Writes a TLV whose payload is produced by `f`. The payload is buffered
/// first, so the length word is always derived from the bytes actually written.
pub(crate) fn encode<W, F>(writer: &mut W, format: u32, f: F) -> Result<(), Error>
where
    W: Write + ?Sized,
    F: FnOnce(&mut bytes::buf::Writer<BytesMut>) -> Result<(), Error>,
{
    let mut payload = BytesMut::new().writer();
    f(&mut payload)?;
    let payload = payload.into_inner();

    writer.write_u32(format)?;
    writer.write_u32(payload.len() as u32)?;
    writer.write_all(&payload)?;

    Ok(())
}

/// Returns an error naming `what` when `count` elements of at least
/// `min_size` bytes cannot fit in what is left of `buf`.
pub(crate) fn check_count(
    buf: &Cursor<&[u8]>,
    what: &'static str,
    count: u32,
    min_size: usize,
) -> Result<(), Error> {
    let available = buf.remaining();
    if (count as usize).saturating_mul(min_size) > available {
        return Err(Error::CountExceedsRecord {
            what,
            count,
            available,
        });
    }

    Ok(())
}
