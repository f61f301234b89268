use std::fmt;

/// Byte order used when decoding multi-byte fields.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Endianness {
    Little,
    Big,
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Little
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little-endian"),
            Endianness::Big => write!(f, "big-endian"),
        }
    }
}

/// The semantic type of one field, with a fixed width in bytes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FieldKind {
    Int32,
    Int64,
    Float32,
    Float64,
    /// Fixed-width text span, NUL-padded on the right.
    Text(usize),
    /// Fixed-width opaque byte span.
    Bytes(usize),
}

impl FieldKind {
    pub const fn width(self) -> usize {
        use FieldKind::*;

        match self {
            Int32 | Float32 => 4,
            Int64 | Float64 => 8,
            Text(n) | Bytes(n) => n,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FieldKind::*;

        match self {
            Int32 => write!(f, "i32"),
            Int64 => write!(f, "i64"),
            Float32 => write!(f, "f32"),
            Float64 => write!(f, "f64"),
            Text(n) => write!(f, "text[{}]", n),
            Bytes(n) => write!(f, "bytes[{}]", n),
        }
    }
}

/// A single named field within a record layout.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new<S: Into<String>>(name: S, kind: FieldKind) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LayoutError {
    #[error("record layout has no fields")]
    Empty,

    #[error("field `{0}` has a zero-width span")]
    ZeroWidthField(String),
}

/// The physical shape of one record: ordered fields, byte order, fixed size.
///
/// Immutable once constructed; performs no I/O.
#[derive(Debug, Clone)]
pub struct RecordLayout {
    fields: Vec<FieldSpec>,
    endianness: Endianness,
    record_size: usize,
}

impl RecordLayout {
    pub fn new(fields: Vec<FieldSpec>, endianness: Endianness) -> Result<RecordLayout, LayoutError> {
        if fields.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut record_size = 0usize;
        for field in &fields {
            if field.kind.width() == 0 {
                return Err(LayoutError::ZeroWidthField(field.name.clone()));
            }
            record_size += field.kind.width();
        }

        Ok(RecordLayout {
            fields,
            endianness,
            record_size,
        })
    }

    #[inline(always)]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[inline(always)]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Size in bytes of one record under this layout.
    #[inline(always)]
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Number of whole records a file of `file_size` bytes can contain.
    #[inline(always)]
    pub fn expected_records(&self, file_size: u64) -> u64 {
        file_size / self.record_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_size_sums_field_widths() {
        let layout = RecordLayout::new(
            vec![
                FieldSpec::new("id", FieldKind::Int32),
                FieldSpec::new("value", FieldKind::Float64),
                FieldSpec::new("code", FieldKind::Text(10)),
            ],
            Endianness::Little,
        )
        .unwrap();

        assert_eq!(layout.record_size(), 22);
        assert_eq!(layout.expected_records(66), 3);
        assert_eq!(layout.expected_records(76), 3);
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert!(matches!(
            RecordLayout::new(vec![], Endianness::Little),
            Err(LayoutError::Empty)
        ));
    }

    #[test]
    fn zero_width_span_is_rejected() {
        let err = RecordLayout::new(
            vec![FieldSpec::new("tag", FieldKind::Text(0))],
            Endianness::Little,
        )
        .unwrap_err();

        assert!(matches!(err, LayoutError::ZeroWidthField(name) if name == "tag"));
    }
}
