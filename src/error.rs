use std::io;
use thiserror::Error;

/// Failure taxonomy for archive decoding and template-based saving.
///
/// Framing violations (`TruncatedStream`, `MissingSentinel`, `MalformedBlock`)
/// abort the read at the current stream position. Sheets that do not fit a
/// known array shape are skipped by the assembler and never surface here.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Stream is not a recognised project archive: {0}")]
    NotAnArchive(String),
    #[error("Truncated stream: needed {needed} bytes, got {got}")]
    TruncatedStream { needed: usize, got: usize },
    #[error("Missing block sentinel: expected 0x0a, found {0:#04x}")]
    MissingSentinel(u8),
    #[error("Malformed block: trailing sentinel was {0:#04x}")]
    MalformedBlock(u8),
    #[error("Malformed header block: {0} bytes, need at least {min}", min = crate::header::HEADER_MIN_LEN)]
    MalformedHeader(usize),
    #[error("Truncated record: {len} data bytes not divisible into {width}-byte values")]
    TruncatedRecord { len: usize, width: u8 },
    #[error("Template archive unavailable: {0}")]
    TemplateUnavailable(String),
    #[error("Corrupt template archive: {0}")]
    CorruptTemplate(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
