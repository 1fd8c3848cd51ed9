//! Column header decoding.
//!
//! Each data column in the archive is announced by one header block whose
//! fields sit at fixed byte offsets. The layout was reverse-engineered;
//! offsets are frozen here and never negotiated.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::ArchiveError;

/// Minimum header block length: covers the name field at offset 88..113.
pub const HEADER_MIN_LEN: usize = 113;

/// Byte offset of `data_kind` (i16 LE).
pub const OFFSET_DATA_KIND: usize = 22;
/// Byte offset of `row_count` (u32 LE).
pub const OFFSET_ROW_COUNT: usize = 25;
/// Byte offset of `value_width` (u8).
pub const OFFSET_VALUE_WIDTH: usize = 61;
/// Byte offset and length of the null-padded composite name.
pub const OFFSET_NAME: usize = 88;
pub const NAME_LEN: usize = 25;

/// One decoded column header.
///
/// `raw_name` is split on its last `_` into the owning sheet's name and the
/// column tag. A name without an underscore is legal: the whole name is the
/// column tag and the sheet name is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub data_kind:   i16,
    pub row_count:   u32,
    pub value_width: u8,
    pub sheet_name:  String,
    pub column_tag:  String,
}

impl ColumnHeader {
    pub fn decode(block: &[u8]) -> Result<Self, ArchiveError> {
        if block.len() < HEADER_MIN_LEN {
            return Err(ArchiveError::MalformedHeader(block.len()));
        }

        let data_kind   = LittleEndian::read_i16(&block[OFFSET_DATA_KIND..OFFSET_DATA_KIND + 2]);
        let row_count   = LittleEndian::read_u32(&block[OFFSET_ROW_COUNT..OFFSET_ROW_COUNT + 4]);
        let value_width = block[OFFSET_VALUE_WIDTH];

        let name_field = &block[OFFSET_NAME..OFFSET_NAME + NAME_LEN];
        let raw_name   = null_terminated(name_field);
        let (sheet_name, column_tag) = split_name(&raw_name);

        Ok(Self {
            data_kind,
            row_count,
            value_width,
            sheet_name: sheet_name.to_owned(),
            column_tag: column_tag.to_owned(),
        })
    }
}

/// Text up to the first NUL of a fixed-size name field.
fn null_terminated(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Split `Run1_A` into `("Run1", "A")`. The last underscore wins, so
/// `S_0_X` splits into `("S_0", "X")`. No underscore: empty sheet name.
fn split_name(raw: &str) -> (&str, &str) {
    match raw.rfind('_') {
        Some(pos) => (&raw[..pos], &raw[pos + 1..]),
        None      => ("", raw),
    }
}
