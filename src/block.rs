//! Block framing — the lowest-level record unit of the archive.
//!
//! Every piece of archive content after the magic line is framed as
//! `[u32 LE length][0x0a]([payload][0x0a])?`. A zero length is the
//! end-of-list marker and carries no payload. The sentinel byte must be
//! present on both sides of the payload; anything else is a framing
//! violation and decoding stops at the current stream position.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::error::ArchiveError;

/// The framing sentinel. Fixed by the on-disk format.
pub const SENTINEL: u8 = b'\n';

/// Read the 5-byte size prelude of a block: a little-endian u32 length
/// followed by the sentinel.
pub fn read_block_size<R: Read>(reader: &mut R) -> Result<u32, ArchiveError> {
    let mut prelude = [0u8; 5];
    let got = fill(reader, &mut prelude)?;
    if got < prelude.len() {
        return Err(ArchiveError::TruncatedStream { needed: prelude.len(), got });
    }
    if prelude[4] != SENTINEL {
        return Err(ArchiveError::MissingSentinel(prelude[4]));
    }
    Ok(LittleEndian::read_u32(&prelude[..4]))
}

/// Read one complete block. `Ok(None)` is the zero-length end-of-list
/// marker, not an error.
pub fn read_block<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, ArchiveError> {
    let size = read_block_size(reader)? as usize;
    if size == 0 {
        return Ok(None);
    }
    let mut payload = vec![0u8; size];
    let got = fill(reader, &mut payload)?;
    if got < size {
        return Err(ArchiveError::TruncatedStream { needed: size, got });
    }
    let trailer = reader.read_u8().map_err(|_| ArchiveError::TruncatedStream {
        needed: size + 1,
        got:    size,
    })?;
    if trailer != SENTINEL {
        return Err(ArchiveError::MalformedBlock(trailer));
    }
    Ok(Some(payload))
}

/// Write one block with the exact inverse framing of [`read_block`].
/// `None` emits the zero-length end-of-list marker.
pub fn write_block<W: Write>(writer: &mut W, payload: Option<&[u8]>) -> Result<(), ArchiveError> {
    match payload {
        Some(bytes) => {
            writer.write_u32::<LittleEndian>(bytes.len() as u32)?;
            writer.write_u8(SENTINEL)?;
            writer.write_all(bytes)?;
            writer.write_u8(SENTINEL)?;
        }
        None => {
            writer.write_u32::<LittleEndian>(0)?;
            writer.write_u8(SENTINEL)?;
        }
    }
    Ok(())
}

/// Read as many bytes as the stream will give, up to `buf.len()`.
/// Unlike `read_exact` this reports how far it got, which the framing
/// errors above need for their diagnostics.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ArchiveError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArchiveError::Io(e)),
        }
    }
    Ok(filled)
}
