//! The write-side inverse of [`parse`](crate::parse): encode field values
//! into one record's bytes per a layout.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::layout::{Endianness, FieldKind, RecordLayout};
use crate::record::FieldValue;

#[derive(Debug, Clone, thiserror::Error)]
pub enum EncodeError {
    #[error("layout has {expected} fields, got {received} values")]
    FieldCount { expected: usize, received: usize },

    #[error("field `{field}`: expected a {expected} value, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("field `{field}`: value is {len} bytes, span width is {width}")]
    Oversize {
        field: String,
        len: usize,
        width: usize,
    },
}

/// Encode one record's field values in layout order.
///
/// Text and byte spans shorter than their declared width are NUL-padded on
/// the right; longer values are rejected rather than truncated.
pub fn encode_record(layout: &RecordLayout, values: &[FieldValue]) -> Result<Vec<u8>, EncodeError> {
    if values.len() != layout.fields().len() {
        return Err(EncodeError::FieldCount {
            expected: layout.fields().len(),
            received: values.len(),
        });
    }

    let mut out = Vec::with_capacity(layout.record_size());

    for (field, value) in layout.fields().iter().zip(values) {
        encode_field(field.kind, layout.endianness(), &field.name, value, &mut out)?;
    }

    Ok(out)
}

fn encode_field(
    kind: FieldKind,
    endianness: Endianness,
    name: &str,
    value: &FieldValue,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    use Endianness::*;

    let mismatch = |expected: &'static str| EncodeError::TypeMismatch {
        field: name.to_string(),
        expected,
        actual: value.type_name(),
    };

    match kind {
        FieldKind::Int32 => {
            let v = match value {
                FieldValue::Int32(v) => *v,
                _ => return Err(mismatch("i32")),
            };
            let mut buf = [0u8; 4];
            match endianness {
                Little => LittleEndian::write_i32(&mut buf, v),
                Big => BigEndian::write_i32(&mut buf, v),
            }
            out.extend_from_slice(&buf);
        }
        FieldKind::Int64 => {
            let v = match value {
                FieldValue::Int64(v) => *v,
                _ => return Err(mismatch("i64")),
            };
            let mut buf = [0u8; 8];
            match endianness {
                Little => LittleEndian::write_i64(&mut buf, v),
                Big => BigEndian::write_i64(&mut buf, v),
            }
            out.extend_from_slice(&buf);
        }
        FieldKind::Float32 => {
            let v = match value {
                FieldValue::Float32(v) => *v,
                _ => return Err(mismatch("f32")),
            };
            let mut buf = [0u8; 4];
            match endianness {
                Little => LittleEndian::write_f32(&mut buf, v),
                Big => BigEndian::write_f32(&mut buf, v),
            }
            out.extend_from_slice(&buf);
        }
        FieldKind::Float64 => {
            let v = match value {
                FieldValue::Float64(v) => *v,
                _ => return Err(mismatch("f64")),
            };
            let mut buf = [0u8; 8];
            match endianness {
                Little => LittleEndian::write_f64(&mut buf, v),
                Big => BigEndian::write_f64(&mut buf, v),
            }
            out.extend_from_slice(&buf);
        }
        FieldKind::Text(width) => {
            // Raw bytes are accepted into text spans so callers can produce
            // data in encodings other than the writer's own.
            let bytes = match value {
                FieldValue::Text(s) => s.as_bytes(),
                FieldValue::Bytes(b) => b.as_slice(),
                _ => return Err(mismatch("text")),
            };
            write_span(name, bytes, width, out)?;
        }
        FieldKind::Bytes(width) => {
            let bytes = match value {
                FieldValue::Bytes(b) => b.as_slice(),
                _ => return Err(mismatch("bytes")),
            };
            write_span(name, bytes, width, out)?;
        }
    }

    Ok(())
}

fn write_span(name: &str, bytes: &[u8], width: usize, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    if bytes.len() > width {
        return Err(EncodeError::Oversize {
            field: name.to_string(),
            len: bytes.len(),
            width,
        });
    }
    out.extend_from_slice(bytes);
    out.resize(out.len() + width - bytes.len(), 0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldSpec;
    use crate::parse::parse_record;

    fn layout() -> RecordLayout {
        RecordLayout::new(
            vec![
                FieldSpec::new("id", FieldKind::Int32),
                FieldSpec::new("value", FieldKind::Float64),
                FieldSpec::new("code", FieldKind::Text(10)),
            ],
            Endianness::Little,
        )
        .unwrap()
    }

    #[test]
    fn encoded_record_parses_back() {
        let layout = layout();
        let bytes = encode_record(
            &layout,
            &[
                FieldValue::Int32(101),
                FieldValue::Float64(250.75),
                FieldValue::Text("AB123".into()),
            ],
        )
        .unwrap();

        assert_eq!(bytes.len(), layout.record_size());

        let values = parse_record(&layout, &bytes).unwrap();
        assert_eq!(values[0], FieldValue::Int32(101));
        assert_eq!(values[1], FieldValue::Float64(250.75));
        assert_eq!(values[2], FieldValue::Bytes(b"AB123\0\0\0\0\0".to_vec()));
    }

    #[test]
    fn oversize_text_is_rejected() {
        let err = encode_record(
            &layout(),
            &[
                FieldValue::Int32(1),
                FieldValue::Float64(0.0),
                FieldValue::Text("ABCDEFGHIJK".into()),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, EncodeError::Oversize { width: 10, len: 11, .. }));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let err = encode_record(
            &layout(),
            &[
                FieldValue::Int64(1),
                FieldValue::Float64(0.0),
                FieldValue::Text("A".into()),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, EncodeError::TypeMismatch { expected: "i32", .. }));
    }
}
