//! Template-patching save path.
//!
//! The writer never generates an archive from nothing. It clones a
//! known-good single-sheet template up to its first column header, then
//! rewrites one header/data/mask triple per vector of the dataset (each
//! coordinate axis, then the payload), reusing the template's first triple
//! as a structural skeleton and patching only the 25-byte name field. The
//! trailing graph/window records are copied verbatim, not regenerated;
//! multi-sheet saving is out of scope.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Read, Write};

use crate::array::ScientificArray;
use crate::block::{read_block, write_block};
use crate::error::ArchiveError;
use crate::header::{ColumnHeader, NAME_LEN, OFFSET_NAME};
use crate::magic::sniff_raw;

/// Columns are lettered `A`, `B`, ... after the dataset name; the name is
/// truncated so the composite still fits the 25-byte field.
const NAME_BUDGET: usize = NAME_LEN - 1;

/// Number of structural blocks copied verbatim after the data section.
const TRAILING_BLOCKS: usize = 3;

/// Patch `template` into `out`, storing `array` under `name`.
///
/// Both streams live for this one call; the caller owns closing them
/// (dropping a `File` on any exit path closes it).
pub fn save_archive<R: Read, W: Write>(
    template: &mut R,
    out:      &mut W,
    array:    &ScientificArray,
    name:     &str,
) -> Result<(), ArchiveError> {
    // Magic line: validated, then copied verbatim.
    let (_, raw_magic) = sniff_raw(template).map_err(corrupt)?;
    out.write_all(&raw_magic)?;

    // First template triple = the structural skeleton.
    let skeleton_header = template_block(template)?
        .ok_or_else(|| ArchiveError::CorruptTemplate("template has no column header".into()))?;
    ColumnHeader::decode(&skeleton_header).map_err(corrupt)?;
    let _skeleton_data = template_block(template)?; // every data block is rewritten
    let skeleton_mask = template_block(template)?;

    for (index, vector) in array.axes.iter().chain([&array.data]).enumerate() {
        let mut header = skeleton_header.clone();
        patch_name(&mut header, name, index);
        write_block(out, Some(&header))?;
        write_block(out, Some(&encode_vector(vector)?))?;
        write_block(out, skeleton_mask.as_deref())?;
    }

    for _ in 0..TRAILING_BLOCKS {
        let block = template_block(template)?;
        write_block(out, block.as_deref())?;
    }

    out.flush()?;
    Ok(())
}

/// 2 pad bytes, then each value as an LE f64. The pad mirrors the 2-byte
/// tag slot of width-10 records in the template's header.
fn encode_vector(values: &[f64]) -> Result<Vec<u8>, ArchiveError> {
    let mut bytes = Vec::with_capacity(2 + values.len() * 8);
    bytes.write_u16::<LittleEndian>(0)?;
    for &v in values {
        bytes.write_f64::<LittleEndian>(v)?;
    }
    Ok(bytes)
}

/// Overwrite the skeleton's name field with `name` + column letter,
/// null-padded to the full 25 bytes.
fn patch_name(header: &mut [u8], name: &str, index: usize) {
    let mut composite: String = name.chars().take(NAME_BUDGET).collect();
    composite.push((b'A' + index as u8) as char);

    let field = &mut header[OFFSET_NAME..OFFSET_NAME + NAME_LEN];
    field.fill(0);
    let bytes = composite.as_bytes();
    let len = bytes.len().min(NAME_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
}

fn template_block<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, ArchiveError> {
    read_block(reader).map_err(corrupt)
}

fn corrupt(e: ArchiveError) -> ArchiveError {
    ArchiveError::CorruptTemplate(e.to_string())
}
