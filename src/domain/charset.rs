//! Character sets a DOT document can be declared in.
//!
//! Graphviz reads the `charset` graph attribute; dotkit uses the same
//! labels to decode input bytes and encode serialized output.

use crate::error::{DotError, Result};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    /// Parse a charset label as Graphviz accepts it.
    pub fn from_label(label: &str) -> Option<Charset> {
        let label = label.trim_matches('"').to_ascii_lowercase();
        match label.as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "latin1" | "latin-1" | "l1" | "iso-8859-1" | "iso_8859-1" | "iso8859-1" | "iso-ir-100" => {
                Some(Charset::Latin1)
            }
            "us-ascii" | "ascii" => Some(Charset::Ascii),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "latin1",
            Charset::Ascii => "us-ascii",
        }
    }

    /// Decode bytes; the error names the offset of the first bad byte.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Ok(s.to_string()),
                Err(e) => Err(DotError::Decode {
                    charset: self.label(),
                    offset: e.valid_up_to(),
                }),
            },
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(DotError::Decode {
                    charset: self.label(),
                    offset,
                }),
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let limit = match self {
            Charset::Utf8 => return Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => 0xFF,
            Charset::Ascii => 0x7F,
        };
        text.chars()
            .map(|ch| {
                let code = ch as u32;
                if code <= limit {
                    Ok(code as u8)
                } else {
                    Err(DotError::Encode {
                        charset: self.label(),
                        ch,
                    })
                }
            })
            .collect()
    }
}

impl FromStr for Charset {
    type Err = DotError;

    fn from_str(s: &str) -> Result<Self> {
        Charset::from_label(s).ok_or_else(|| DotError::UnknownCharset(s.to_string()))
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(Charset::from_label("latin1"), Some(Charset::Latin1));
        assert_eq!(Charset::from_label("ISO-8859-1"), Some(Charset::Latin1));
        assert_eq!(Charset::from_label("\"UTF-8\""), Some(Charset::Utf8));
        assert_eq!(Charset::from_label("ebcdic"), None);
        assert!("koi8-r".parse::<Charset>().is_err());
    }

    #[test]
    fn test_utf8_decode_error_offset() {
        let err = Charset::Utf8.decode(b"ab\xffcd").unwrap_err();
        match err {
            DotError::Decode { offset, .. } => assert_eq!(offset, 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Charset::Utf8.decode(b"ab\xffcd").unwrap_err().is_parse());
    }

    #[test]
    fn test_latin1_round_trip() {
        let bytes = b"caf\xe9";
        let text = Charset::Latin1.decode(bytes).unwrap();
        assert_eq!(text, "café");
        assert_eq!(Charset::Latin1.encode(&text).unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_encode_unrepresentable() {
        assert!(matches!(
            Charset::Latin1.encode("日本"),
            Err(DotError::Encode { ch: '日', .. })
        ));
        assert!(Charset::Ascii.encode("é").is_err());
        assert!(Charset::Ascii.decode(b"\x80").is_err());
    }
}
