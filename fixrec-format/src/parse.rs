//! Sans-IO decoding of one record from a byte slice.
//!
//! These functions work on exact-size slices without any I/O traits; the
//! reader hands them whole-record buffers and maps failures into its error
//! log.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::layout::{Endianness, FieldKind, RecordLayout};
use crate::record::FieldValue;

/// A record buffer whose length does not match the layout's fixed size.
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("got {received} bytes, layout requires exactly {expected}")]
pub struct UnpackError {
    pub expected: usize,
    pub received: usize,
}

/// Decode one field from an exact-width slice.
///
/// Text spans are returned as raw bytes; character decoding is a separate
/// concern with its own fallback chain.
fn parse_field(kind: FieldKind, endianness: Endianness, data: &[u8]) -> FieldValue {
    use Endianness::*;

    match kind {
        FieldKind::Int32 => FieldValue::Int32(match endianness {
            Little => LittleEndian::read_i32(data),
            Big => BigEndian::read_i32(data),
        }),
        FieldKind::Int64 => FieldValue::Int64(match endianness {
            Little => LittleEndian::read_i64(data),
            Big => BigEndian::read_i64(data),
        }),
        FieldKind::Float32 => FieldValue::Float32(match endianness {
            Little => LittleEndian::read_f32(data),
            Big => BigEndian::read_f32(data),
        }),
        FieldKind::Float64 => FieldValue::Float64(match endianness {
            Little => LittleEndian::read_f64(data),
            Big => BigEndian::read_f64(data),
        }),
        FieldKind::Text(_) | FieldKind::Bytes(_) => FieldValue::Bytes(data.to_vec()),
    }
}

/// Decode one record's bytes into field values in layout order.
///
/// The buffer must be exactly `layout.record_size()` bytes.
pub fn parse_record(layout: &RecordLayout, data: &[u8]) -> Result<Vec<FieldValue>, UnpackError> {
    if data.len() != layout.record_size() {
        return Err(UnpackError {
            expected: layout.record_size(),
            received: data.len(),
        });
    }

    let mut values = Vec::with_capacity(layout.fields().len());
    let mut pos = 0;

    for field in layout.fields() {
        let width = field.kind.width();
        values.push(parse_field(
            field.kind,
            layout.endianness(),
            &data[pos..pos + width],
        ));
        pos += width;
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldSpec;

    fn layout(endianness: Endianness) -> RecordLayout {
        RecordLayout::new(
            vec![
                FieldSpec::new("id", FieldKind::Int32),
                FieldSpec::new("value", FieldKind::Float64),
                FieldSpec::new("code", FieldKind::Text(10)),
            ],
            endianness,
        )
        .unwrap()
    }

    #[test]
    fn parses_little_endian_record() {
        let mut data = Vec::new();
        data.extend_from_slice(&7i32.to_le_bytes());
        data.extend_from_slice(&1.5f64.to_le_bytes());
        data.extend_from_slice(b"AB123\0\0\0\0\0");

        let values = parse_record(&layout(Endianness::Little), &data).unwrap();
        assert_eq!(values[0], FieldValue::Int32(7));
        assert_eq!(values[1], FieldValue::Float64(1.5));
        assert_eq!(values[2], FieldValue::Bytes(b"AB123\0\0\0\0\0".to_vec()));
    }

    #[test]
    fn parses_big_endian_record() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-9i32).to_be_bytes());
        data.extend_from_slice(&2.25f64.to_be_bytes());
        data.extend_from_slice(&[0u8; 10]);

        let values = parse_record(&layout(Endianness::Big), &data).unwrap();
        assert_eq!(values[0], FieldValue::Int32(-9));
        assert_eq!(values[1], FieldValue::Float64(2.25));
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let err = parse_record(&layout(Endianness::Little), &[0u8; 12]).unwrap_err();
        assert_eq!(
            err,
            UnpackError {
                expected: 22,
                received: 12
            }
        );
    }
}
