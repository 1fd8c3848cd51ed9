//! Sheet assembly — drives the decode loop and pivots finished sheets
//! into scientific arrays.
//!
//! Columns arrive from the stream as independent header/data/mask triples;
//! the composite name in each header decides which spreadsheet the column
//! belongs to. Sheets are looked up by a linear name scan in first-seen
//! order — the table is a handful of entries, so the O(n²) scan is fine.
//!
//! # Partial-failure policy
//! A framing or record failure aborts the loop at the current position. If
//! at least one column was already assembled the failure is logged and the
//! sheets decoded so far are kept; a failure before anything decoded
//! propagates, since the stream produced no usable data at all.

use std::io::Read;

use log::{debug, warn};

use crate::array::ScientificArray;
use crate::block::read_block;
use crate::error::ArchiveError;
use crate::header::ColumnHeader;
use crate::value::{decode_values, Cell};

/// One decoded column: its tag (the part of the name after the last `_`)
/// plus its cells. Owned exclusively by its parent [`Spreadsheet`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub tag:    String,
    pub values: Vec<Cell>,
}

/// A named group of columns in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Spreadsheet {
    pub name:    String,
    pub columns: Vec<Column>,
}

impl Spreadsheet {
    /// Convert a finished sheet into an array, or `None` when the column
    /// count fits no known shape (the caller skips such sheets).
    ///
    /// 2 columns: 1D, column 0 is the coordinate axis, column 1 the data.
    /// 3 columns: 2D, pivoted over the sorted unique values of columns 0
    /// and 1; column 2 fills the grid, unvisited positions stay NaN.
    pub fn to_array(&self) -> Option<ScientificArray> {
        match self.columns.len() {
            2 => {
                let axis = numeric(&self.columns[0]);
                let data = numeric(&self.columns[1]);
                Some(ScientificArray::one_dim(self.name.clone(), axis, data))
            }
            3 => {
                let xs = numeric(&self.columns[0]);
                let ys = numeric(&self.columns[1]);
                let zs = numeric(&self.columns[2]);

                let cx = sorted_unique(&xs);
                let cy = sorted_unique(&ys);
                let mut data = vec![f64::NAN; cx.len() * cy.len()];
                for ((x, y), z) in xs.iter().zip(&ys).zip(&zs) {
                    let (Some(i), Some(j)) = (grid_index(&cx, *x), grid_index(&cy, *y)) else {
                        continue;
                    };
                    data[i * cy.len() + j] = *z;
                }
                Some(ScientificArray::two_dim(self.name.clone(), cx, cy, data))
            }
            n => {
                warn!("sheet {:?} has {n} column(s), no known array shape; skipping", self.name);
                None
            }
        }
    }
}

fn numeric(column: &Column) -> Vec<f64> {
    column.values.iter().map(Cell::as_f64).collect()
}

fn sorted_unique(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}

fn grid_index(axis: &[f64], value: f64) -> Option<usize> {
    axis.binary_search_by(|probe| probe.total_cmp(&value)).ok()
}

// ── Accumulator ──────────────────────────────────────────────────────────────

/// Decode-loop accumulator, owned by one read call. No module state.
#[derive(Debug, Default)]
pub struct SheetSet {
    pub sheets: Vec<Spreadsheet>,
}

impl SheetSet {
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Linear scan by name; creates the sheet on first sight so insertion
    /// order is the order of first appearance in the stream.
    fn find_or_create(&mut self, name: &str) -> &mut Spreadsheet {
        let pos = match self.sheets.iter().position(|s| s.name == name) {
            Some(pos) => pos,
            None => {
                self.sheets.push(Spreadsheet { name: name.to_owned(), columns: Vec::new() });
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[pos]
    }

    /// Arrays for every sheet that fits a known shape; misfits are skipped.
    pub fn into_arrays(self) -> Vec<ScientificArray> {
        self.sheets.iter().filter_map(Spreadsheet::to_array).collect()
    }
}

/// Run the decode loop over a stream positioned just past the magic line.
///
/// Terminates normally at the zero-length end-of-list marker (the archive
/// continues into graph/window records this core does not interpret).
pub fn decode_sheets<R: Read>(reader: &mut R) -> Result<SheetSet, ArchiveError> {
    let mut sheets = SheetSet::default();
    match decode_loop(reader, &mut sheets) {
        Ok(())                       => Ok(sheets),
        Err(e) if !sheets.is_empty() => {
            warn!("archive decode stopped early, keeping decoded sheets: {e}");
            Ok(sheets)
        }
        Err(e) => Err(e),
    }
}

fn decode_loop<R: Read>(reader: &mut R, sheets: &mut SheetSet) -> Result<(), ArchiveError> {
    while let Some(header_block) = read_block(reader)? {
        let header = ColumnHeader::decode(&header_block)?;
        debug!(
            "column {:?}/{:?}: kind={} rows={} width={}",
            header.sheet_name, header.column_tag, header.data_kind, header.row_count,
            header.value_width,
        );

        let data = read_block(reader)?.unwrap_or_default();
        // Mask block: reserved for masked-value support, read and ignored.
        let _mask = read_block(reader)?;

        let values = decode_values(&data, header.value_width, header.data_kind)?;
        let sheet  = sheets.find_or_create(&header.sheet_name);
        sheet.columns.push(Column { tag: header.column_tag, values });
    }
    Ok(())
}
