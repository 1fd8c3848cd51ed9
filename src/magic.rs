use std::io::Read;

use crate::error::ArchiveError;

/// First token of the magic line. Fixed by the on-disk format.
pub const MAGIC: &str = "CPYA";

/// Longest magic line we are willing to scan before declaring the stream
/// unrecognisable. Real archives keep this line well under 40 bytes.
const MAX_MAGIC_LINE: usize = 128;

/// Validated magic line of an archive: `CPYA <version>`.
///
/// Sniffing must run exactly once per stream, before any block is read;
/// its success is the precondition for all further decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken {
    pub version: String,
}

/// Read and validate the magic line, returning the version token.
pub fn sniff<R: Read>(reader: &mut R) -> Result<VersionToken, ArchiveError> {
    sniff_raw(reader).map(|(token, _)| token)
}

/// As [`sniff`], additionally returning the raw line bytes (newline
/// included) so the writer can copy the template's magic line verbatim.
pub fn sniff_raw<R: Read>(reader: &mut R) -> Result<(VersionToken, Vec<u8>), ArchiveError> {
    let raw = read_magic_line(reader)?;
    let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some(tok) if tok == MAGIC => {}
        _ => return Err(ArchiveError::NotAnArchive(format!("bad magic line {line:?}"))),
    }
    let version = tokens
        .next()
        .ok_or_else(|| ArchiveError::NotAnArchive("magic line has no version token".into()))?
        .to_owned();
    Ok((VersionToken { version }, raw))
}

/// Read bytes up to and including the first newline, bounded by
/// [`MAX_MAGIC_LINE`]. EOF or an over-long line both mean the stream is
/// not an archive.
fn read_magic_line<R: Read>(reader: &mut R) -> Result<Vec<u8>, ArchiveError> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Err(ArchiveError::NotAnArchive("stream ends before magic line".into())),
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    return Ok(line);
                }
                if line.len() > MAX_MAGIC_LINE {
                    return Err(ArchiveError::NotAnArchive("magic line too long".into()));
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArchiveError::Io(e)),
        }
    }
}
