use std::fmt;

/// Character encodings supported for fixed-width text spans.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TextEncoding {
    Ascii,
    Latin1,
    Utf8,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Ascii => write!(f, "ascii"),
            TextEncoding::Latin1 => write!(f, "latin-1"),
            TextEncoding::Utf8 => write!(f, "utf-8"),
        }
    }
}

impl TextEncoding {
    fn decode_strict(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    Some(bytes.iter().map(|&b| b as char).collect())
                } else {
                    None
                }
            }
            // Latin-1 maps every byte to the code point of the same value.
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
        }
    }

    fn decode_lossy(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// Decodes fixed-width text spans with a two-stage fallback.
///
/// The primary encoding is tried first; on failure the fallback encoding is
/// tried, and if that also fails the fallback is applied with unmappable
/// bytes replaced by U+FFFD. Trailing NUL padding and surrounding whitespace
/// are always stripped. Decoding never fails.
#[derive(Debug, Clone)]
pub struct TextDecoder {
    primary: TextEncoding,
    fallback: TextEncoding,
}

impl Default for TextDecoder {
    fn default() -> Self {
        TextDecoder {
            primary: TextEncoding::Ascii,
            fallback: TextEncoding::Latin1,
        }
    }
}

impl TextDecoder {
    pub fn new(primary: TextEncoding, fallback: TextEncoding) -> TextDecoder {
        TextDecoder { primary, fallback }
    }

    pub fn decode(&self, bytes: &[u8], record_number: u64) -> String {
        if let Some(text) = self.primary.decode_strict(bytes) {
            return clean(text);
        }

        tracing::warn!(
            record_number,
            primary = %self.primary,
            fallback = %self.fallback,
            "text span not valid in primary encoding, retrying with fallback"
        );

        if let Some(text) = self.fallback.decode_strict(bytes) {
            return clean(text);
        }

        tracing::error!(
            record_number,
            fallback = %self.fallback,
            "text span not valid in either encoding, substituting unmappable bytes"
        );

        clean(self.fallback.decode_lossy(bytes))
    }
}

fn clean(text: String) -> String {
    text.trim_end_matches('\0').trim().to_string()
}
