use cpya::error::ArchiveError;
use cpya::header::{
    ColumnHeader, HEADER_MIN_LEN, OFFSET_DATA_KIND, OFFSET_NAME, OFFSET_ROW_COUNT,
    OFFSET_VALUE_WIDTH,
};
use cpya::value::{decode_values, Cell, DATA_KIND_TAGGED};

fn header_block(name: &str, data_kind: i16, row_count: u32, value_width: u8) -> Vec<u8> {
    let mut block = vec![0u8; HEADER_MIN_LEN];
    block[OFFSET_DATA_KIND..OFFSET_DATA_KIND + 2].copy_from_slice(&data_kind.to_le_bytes());
    block[OFFSET_ROW_COUNT..OFFSET_ROW_COUNT + 4].copy_from_slice(&row_count.to_le_bytes());
    block[OFFSET_VALUE_WIDTH] = value_width;
    block[OFFSET_NAME..OFFSET_NAME + name.len()].copy_from_slice(name.as_bytes());
    block
}

// ── Header decoding ──────────────────────────────────────────────────────────

#[test]
fn header_fields_decode_at_fixed_offsets() {
    let h = ColumnHeader::decode(&header_block("Run1_A", -3, 1000, 8)).unwrap();
    assert_eq!(h.data_kind, -3);
    assert_eq!(h.row_count, 1000);
    assert_eq!(h.value_width, 8);
    assert_eq!(h.sheet_name, "Run1");
    assert_eq!(h.column_tag, "A");
}

#[test]
fn header_name_splits_on_last_underscore() {
    let h = ColumnHeader::decode(&header_block("S_0_X", 0, 4, 8)).unwrap();
    assert_eq!(h.sheet_name, "S_0");
    assert_eq!(h.column_tag, "X");
}

#[test]
fn header_name_without_underscore_is_accepted() {
    let h = ColumnHeader::decode(&header_block("lonely", 0, 4, 8)).unwrap();
    assert_eq!(h.sheet_name, "");
    assert_eq!(h.column_tag, "lonely");
}

#[test]
fn short_header_block_is_malformed() {
    let err = ColumnHeader::decode(&vec![0u8; HEADER_MIN_LEN - 1]).unwrap_err();
    assert!(matches!(err, ArchiveError::MalformedHeader(_)));
}

#[test]
fn oversized_header_block_is_fine() {
    let mut block = header_block("Big_Z", 0, 1, 8);
    block.resize(400, 0xee);
    assert!(ColumnHeader::decode(&block).is_ok());
}

// ── Fixed-width numeric decoding ─────────────────────────────────────────────

#[test]
fn width_1_decodes_unsigned_bytes() {
    let cells = decode_values(&[0, 1, 127, 255], 1, 0).unwrap();
    assert_eq!(
        cells,
        vec![Cell::Number(0.0), Cell::Number(1.0), Cell::Number(127.0), Cell::Number(255.0)]
    );
}

#[test]
fn width_2_decodes_signed_le_shorts() {
    let mut data = Vec::new();
    for v in [-1i16, 300, i16::MIN] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    let cells = decode_values(&data, 2, 0).unwrap();
    assert_eq!(
        cells,
        vec![Cell::Number(-1.0), Cell::Number(300.0), Cell::Number(i16::MIN as f64)]
    );
}

#[test]
fn width_4_decodes_signed_le_ints() {
    let data = (-2i32).to_le_bytes();
    assert_eq!(decode_values(&data, 4, 0).unwrap(), vec![Cell::Number(-2.0)]);
}

#[test]
fn width_8_decodes_le_doubles_and_counts_cells() {
    let mut data = Vec::new();
    for v in [1.0f64, 2.5, -3.75, 4.0] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    let cells = decode_values(&data, 8, 0).unwrap();
    assert_eq!(cells.len(), data.len() / 8);
    assert_eq!(cells[2], Cell::Number(-3.75));
}

#[test]
fn uneven_data_length_is_truncated_record() {
    let err = decode_values(&[0u8; 7], 8, 0).unwrap_err();
    assert!(matches!(err, ArchiveError::TruncatedRecord { len: 7, width: 8 }));
}

#[test]
fn zero_width_is_truncated_record_not_a_panic() {
    let err = decode_values(&[1, 2, 3], 0, 0).unwrap_err();
    assert!(matches!(err, ArchiveError::TruncatedRecord { width: 0, .. }));
}

// ── Tagged / text decoding ───────────────────────────────────────────────────

#[test]
fn untagged_text_truncates_at_first_null() {
    let mut data = Vec::new();
    data.extend_from_slice(b"hello\0pad!");
    data.extend_from_slice(b"world\0....");
    let cells = decode_values(&data, 10, 0).unwrap();
    assert_eq!(cells, vec![Cell::Text("hello".into()), Cell::Text("world".into())]);
}

#[test]
fn untagged_text_without_null_takes_whole_chunk() {
    let cells = decode_values(b"0123456789", 10, 0).unwrap();
    assert_eq!(cells, vec![Cell::Text("0123456789".into())]);
}

#[test]
fn tagged_null_tag_is_a_double() {
    let mut chunk = vec![0u8, 0];
    chunk.extend_from_slice(&6.25f64.to_le_bytes());
    let cells = decode_values(&chunk, 10, DATA_KIND_TAGGED).unwrap();
    assert_eq!(cells, vec![Cell::Number(6.25)]);
}

#[test]
fn tagged_nonnull_tag_is_text() {
    let mut chunk = vec![1u8, 0];
    chunk.extend_from_slice(b"abc\0zzzz");
    let cells = decode_values(&chunk, 10, DATA_KIND_TAGGED).unwrap();
    assert_eq!(cells, vec![Cell::Text("abc".into())]);
}

#[test]
fn tagged_stream_mixes_numbers_and_text() {
    let mut data = vec![0u8, 0];
    data.extend_from_slice(&(-1.5f64).to_le_bytes());
    data.extend_from_slice(&[2, 0]);
    data.extend_from_slice(b"note\0...");
    let cells = decode_values(&data, 10, DATA_KIND_TAGGED).unwrap();
    assert_eq!(cells, vec![Cell::Number(-1.5), Cell::Text("note".into())]);
}

#[test]
fn tagged_uneven_chunking_is_truncated_record() {
    let err = decode_values(&[0u8; 25], 10, DATA_KIND_TAGGED).unwrap_err();
    assert!(matches!(err, ArchiveError::TruncatedRecord { len: 25, width: 10 }));
}

#[test]
fn decoding_is_stateless_across_calls() {
    let data: Vec<u8> = [10f64, 20.0].iter().flat_map(|v| v.to_le_bytes()).collect();
    let first = decode_values(&data, 8, 0).unwrap();
    let second = decode_values(&data, 8, 0).unwrap();
    assert_eq!(first, second);
}
