//! Description files declare a record layout out-of-band: a field count on
//! the first line, then one `name|c-type` line per field.
//!
//! These files are produced by the CSV analysis tooling that sits upstream
//! of the binary pipeline; the reader itself never parses them. Callers
//! load the layout here and hand it over.

use std::path::{Path, PathBuf};

use crate::layout::{Endianness, FieldKind, FieldSpec, LayoutError, RecordLayout};

#[derive(Debug, thiserror::Error)]
pub enum DescriptionError {
    #[error("cannot read description file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing field count header")]
    MissingHeader,

    #[error("invalid field count `{0}`")]
    InvalidCount(String),

    #[error("line {line}: expected `name|c-type`, got `{text}`")]
    Malformed { line: usize, text: String },

    #[error("line {line}: unsupported c type `{ctype}`")]
    UnsupportedType { line: usize, ctype: String },

    #[error("field count is {declared}, found {found} fields")]
    CountMismatch { declared: usize, found: usize },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Parse description text into a layout.
///
/// `char*` fields have no width of their own in the description; they take
/// `text_width` bytes in the record.
pub fn parse_description(
    text: &str,
    text_width: usize,
    endianness: Endianness,
) -> Result<RecordLayout, DescriptionError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines.next().ok_or(DescriptionError::MissingHeader)?;
    let declared: usize = header
        .parse()
        .map_err(|_| DescriptionError::InvalidCount(header.to_string()))?;

    let mut fields = Vec::with_capacity(declared);
    for (line, text) in lines {
        let (name, ctype) = text
            .split_once('|')
            .ok_or_else(|| DescriptionError::Malformed {
                line,
                text: text.to_string(),
            })?;

        let kind = match ctype.trim() {
            "int" => FieldKind::Int32,
            "long long" => FieldKind::Int64,
            "float" => FieldKind::Float32,
            "double" => FieldKind::Float64,
            "char*" => FieldKind::Text(text_width),
            other => {
                return Err(DescriptionError::UnsupportedType {
                    line,
                    ctype: other.to_string(),
                })
            }
        };

        fields.push(FieldSpec::new(name.trim(), kind));
    }

    if fields.len() != declared {
        return Err(DescriptionError::CountMismatch {
            declared,
            found: fields.len(),
        });
    }

    Ok(RecordLayout::new(fields, endianness)?)
}

/// Load and parse a description file.
pub fn load_description<P: AsRef<Path>>(
    path: P,
    text_width: usize,
    endianness: Endianness,
) -> Result<RecordLayout, DescriptionError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DescriptionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_description(&text, text_width, endianness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_standard_description() {
        let layout = parse_description("3\nid|int\nvalue|double\ncode|char*\n", 10, Endianness::Little)
            .unwrap();

        assert_eq!(layout.record_size(), 22);
        assert_eq!(layout.fields()[0].name, "id");
        assert_eq!(layout.fields()[0].kind, FieldKind::Int32);
        assert_eq!(layout.fields()[1].kind, FieldKind::Float64);
        assert_eq!(layout.fields()[2].kind, FieldKind::Text(10));
    }

    #[test]
    fn parses_every_supported_c_type() {
        let layout = parse_description(
            "4\ncount|int\ntotal|long long\nratio|float\nmean|double\n",
            10,
            Endianness::Little,
        )
        .unwrap();

        assert_eq!(layout.record_size(), 4 + 8 + 4 + 8);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = parse_description("3\nid|int\n", 10, Endianness::Little).unwrap_err();
        assert!(matches!(
            err,
            DescriptionError::CountMismatch {
                declared: 3,
                found: 1
            }
        ));
    }

    #[test]
    fn unknown_c_type_is_rejected() {
        let err = parse_description("1\nwhen|time_t\n", 10, Endianness::Little).unwrap_err();
        assert!(matches!(
            err,
            DescriptionError::UnsupportedType { line: 2, ctype } if ctype == "time_t"
        ));
    }

    #[test]
    fn malformed_line_is_rejected() {
        let err = parse_description("1\njust-a-name\n", 10, Endianness::Little).unwrap_err();
        assert!(matches!(err, DescriptionError::Malformed { line: 2, .. }));
    }

    #[test]
    fn empty_description_is_rejected() {
        assert!(matches!(
            parse_description("", 10, Endianness::Little),
            Err(DescriptionError::MissingHeader)
        ));
        assert!(matches!(
            parse_description("0\n", 10, Endianness::Little),
            Err(DescriptionError::Layout(LayoutError::Empty))
        ));
    }
}
