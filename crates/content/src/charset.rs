//! Character encodings used to turn a text payload into bytes.
//!
//! [`Charset`] names the encoding a [`TextBody`](crate::TextBody) is serialized
//! with and provides the canonical name that ends up in the `charset` parameter
//! of the `Content-Type` header.
//!
//! The common web encodings are handled directly. Any other encoding from the
//! WHATWG Encoding Standard is delegated to [`encoding_rs`], which covers legacy
//! single and multi byte encodings such as `shift_jis` or `windows-1252`.

use crate::ContentError;
use bytes::Bytes;
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A character encoding identifier.
///
/// `Utf8` is the default. None of the encoders emit a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// 7-bit ASCII. Characters outside the range are written as `?`.
    UsAscii,
    /// ISO-8859-1. Characters above U+00FF are written as `?`.
    Latin1,
    Utf16Le,
    Utf16Be,
    /// Any other encoding known to `encoding_rs`.
    ///
    /// Unmappable characters are written as HTML numeric character references.
    /// Obtained through [`Charset::for_label`] or [`Charset::from_encoding`].
    Whatwg(WhatwgEncoding),
}

/// An `encoding_rs` encoding that encodes to itself and has no native [`Charset`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatwgEncoding(&'static Encoding);

impl WhatwgEncoding {
    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }
}

impl Charset {
    /// The name written into the `charset` parameter of a content-type header.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::UsAscii => "us-ascii",
            Charset::Latin1 => "iso-8859-1",
            Charset::Utf16Le => "utf-16",
            Charset::Utf16Be => "utf-16BE",
            Charset::Whatwg(whatwg) => whatwg.0.name(),
        }
    }

    /// Resolves a charset label, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for labels that name no known encoding, including the
    /// labels the WHATWG standard maps to the `replacement` encoding.
    pub fn for_label(label: &str) -> Option<Charset> {
        let label = label.trim().to_ascii_lowercase();
        let charset = match label.as_str() {
            "utf-8" | "utf8" => Charset::Utf8,
            "us-ascii" | "ascii" => Charset::UsAscii,
            "iso-8859-1" | "latin1" => Charset::Latin1,
            "utf-16" | "utf-16le" | "unicode" => Charset::Utf16Le,
            "utf-16be" => Charset::Utf16Be,
            other => Self::from_encoding(Encoding::for_label_no_replacement(other.as_bytes())?)?,
        };
        Some(charset)
    }

    /// Maps an `encoding_rs` encoding onto a charset.
    ///
    /// UTF-8 and UTF-16 map to the native variants. Returns `None` for encodings
    /// whose encoder writes another encoding, such as `replacement`.
    pub fn from_encoding(encoding: &'static Encoding) -> Option<Charset> {
        let charset = if encoding == encoding_rs::UTF_8 {
            Charset::Utf8
        } else if encoding == encoding_rs::UTF_16LE {
            Charset::Utf16Le
        } else if encoding == encoding_rs::UTF_16BE {
            Charset::Utf16Be
        } else if encoding.output_encoding() == encoding {
            Charset::Whatwg(WhatwgEncoding(encoding))
        } else {
            return None;
        };
        Some(charset)
    }

    pub fn encode(&self, text: &str) -> Bytes {
        match self {
            Charset::Utf8 => Bytes::copy_from_slice(text.as_bytes()),
            Charset::UsAscii => {
                text.chars().map(|c| u8::try_from(c).ok().filter(u8::is_ascii).unwrap_or(b'?')).collect()
            }
            Charset::Latin1 => text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect(),
            Charset::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Charset::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Charset::Whatwg(whatwg) => {
                let (bytes, _, _) = whatwg.0.encode(text);
                Bytes::from(bytes.into_owned())
            }
        }
    }

    /// Decodes `bytes` lossily.
    ///
    /// Malformed sequences become U+FFFD, except for `UsAscii` where bytes above
    /// 0x7F become `?`.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            Charset::Utf8 => encoding_rs::UTF_8.decode_without_bom_handling(bytes).0,
            Charset::UsAscii => match std::str::from_utf8(bytes) {
                Ok(str) if bytes.is_ascii() => Cow::Borrowed(str),
                _ => Cow::Owned(bytes.iter().map(|&b| if b.is_ascii() { char::from(b) } else { '?' }).collect()),
            },
            Charset::Latin1 => match std::str::from_utf8(bytes) {
                Ok(str) if bytes.is_ascii() => Cow::Borrowed(str),
                _ => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
            },
            Charset::Utf16Le => encoding_rs::UTF_16LE.decode_without_bom_handling(bytes).0,
            Charset::Utf16Be => encoding_rs::UTF_16BE.decode_without_bom_handling(bytes).0,
            Charset::Whatwg(whatwg) => whatwg.0.decode_without_bom_handling(bytes).0,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for Charset {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::for_label(s).ok_or_else(|| ContentError::unknown_charset(s))
    }
}
