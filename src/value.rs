//! Cell decoding — turns one data block into a sequence of cells.
//!
//! The header's `value_width` selects the decoding strategy:
//!
//! - widths 1/2/4/8 are fixed numeric encodings (u8, i16, i32, f64, all
//!   little-endian), every cell a number;
//! - widths of 10 and above are tagged/variable records. With bit 8 of
//!   `data_kind` set, each record starts with a 2-byte tag: a NUL tag means
//!   the payload opens with an LE f64, any other tag means the payload is
//!   text up to its first NUL. With bit 8 clear the whole record is text.
//!
//! The tag convention was recovered from an external parser and is
//! provisional; verify against real archive samples before extending it.
//!
//! Decoding is a pure function of the block bytes — no state crosses calls,
//! and no chunk is ever partially consumed.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;

use crate::error::ArchiveError;

/// Records with `data_kind & DATA_KIND_TAGGED` carry a 2-byte tag per cell.
pub const DATA_KIND_TAGGED: i16 = 0x100;

const TAG_LEN: usize = 2;

/// One spreadsheet cell: numeric or text, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric view used for array assembly; text coerces to NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(_)   => f64::NAN,
        }
    }
}

/// Decode a data block into cells per the header's width and kind.
pub fn decode_values(data: &[u8], value_width: u8, data_kind: i16) -> Result<Vec<Cell>, ArchiveError> {
    let width = value_width as usize;
    if width == 0 || data.len() % width != 0 {
        return Err(ArchiveError::TruncatedRecord { len: data.len(), width: value_width });
    }

    match value_width {
        1 | 2 | 4 | 8 => Ok(decode_fixed(data, value_width)),
        _             => decode_tagged(data, width, data_kind),
    }
}

fn decode_fixed(data: &[u8], value_width: u8) -> Vec<Cell> {
    data.chunks_exact(value_width as usize)
        .map(|chunk| {
            let v = match value_width {
                1 => chunk[0] as f64,
                2 => LittleEndian::read_i16(chunk) as f64,
                4 => LittleEndian::read_i32(chunk) as f64,
                _ => LittleEndian::read_f64(chunk),
            };
            Cell::Number(v)
        })
        .collect()
}

fn decode_tagged(data: &[u8], width: usize, data_kind: i16) -> Result<Vec<Cell>, ArchiveError> {
    let tagged = data_kind & DATA_KIND_TAGGED != 0;
    let mut cells = Vec::with_capacity(data.len() / width);

    for chunk in data.chunks_exact(width) {
        if !tagged {
            cells.push(Cell::Text(null_truncated(chunk)));
            continue;
        }

        let payload = &chunk[TAG_LEN..];
        if chunk[0] == 0 {
            if payload.len() < 8 {
                return Err(ArchiveError::TruncatedRecord {
                    len:   data.len(),
                    width: width as u8,
                });
            }
            cells.push(Cell::Number(LittleEndian::read_f64(&payload[..8])));
        } else {
            cells.push(Cell::Text(null_truncated(payload)));
        }
    }
    Ok(cells)
}

fn null_truncated(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
