//! The structured `Content-Type` value carried by a text body.
//!
//! A [`MediaTypeHeader`] holds a `type/subtype` media type and an optional
//! `charset` parameter. It renders as `text/plain; charset=utf-8`, or as the bare
//! media type when no charset is set. Media types are validated with the
//! [`mime`] crate so that only well formed values reach the wire.

use crate::utils::ensure;
use crate::{Charset, ContentError};
use http::HeaderValue;
use mime::Mime;
use std::fmt;
use std::str::FromStr;

const DEFAULT_MEDIA_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeHeader {
    media_type: String,
    charset: Option<String>,
}

impl MediaTypeHeader {
    /// Creates a header value without a charset.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidMediaType`] unless `media_type` is a bare
    /// `type/subtype` pair. Parameters are not accepted here; use
    /// [`MediaTypeHeader::from_str`] to parse a full header value.
    pub fn new<S: AsRef<str>>(media_type: S) -> Result<Self, ContentError> {
        let media_type = media_type.as_ref().trim();
        let parsed = media_type.parse::<Mime>().map_err(ContentError::invalid_media_type)?;
        ensure!(
            !parsed.type_().as_str().is_empty() && !parsed.subtype().as_str().is_empty(),
            ContentError::invalid_media_type(format!("'{media_type}' is not a type/subtype pair"))
        );
        ensure!(
            parsed.params().next().is_none(),
            ContentError::invalid_media_type(format!("unexpected parameters in '{media_type}'"))
        );

        Ok(Self { media_type: media_type.to_owned(), charset: None })
    }

    /// Creates a header value with an explicit charset.
    ///
    /// The charset is kept verbatim; it does not need to name an encoding this
    /// crate knows about.
    pub fn with_charset<S: AsRef<str>, C: Into<String>>(media_type: S, charset: C) -> Result<Self, ContentError> {
        let charset = charset.into();
        ensure!(is_token(&charset), ContentError::invalid_media_type(format!("invalid charset '{charset}'")));

        let mut header = Self::new(media_type)?;
        header.charset = Some(charset);
        Ok(header)
    }

    /// The header synthesized when neither a media type nor a header value is given.
    pub(crate) fn text_plain(charset: Charset) -> Self {
        Self { media_type: DEFAULT_MEDIA_TYPE.to_owned(), charset: Some(charset.canonical_name().to_owned()) }
    }

    /// Fills in the charset from `charset` unless one is already present.
    pub(crate) fn or_charset(mut self, charset: Charset) -> Self {
        if self.charset.is_none() {
            self.charset = Some(charset.canonical_name().to_owned());
        }
        self
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Converts into a header value suitable for an `http::HeaderMap`.
    pub fn to_header_value(&self) -> Result<HeaderValue, ContentError> {
        HeaderValue::from_str(&self.to_string()).map_err(ContentError::invalid_media_type)
    }
}

impl fmt::Display for MediaTypeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.charset {
            Some(charset) => write!(f, "{}; charset={}", self.media_type, charset),
            None => f.write_str(&self.media_type),
        }
    }
}

impl FromStr for MediaTypeHeader {
    type Err = ContentError;

    /// Parses a full content-type value such as `text/html; charset=utf-8`.
    ///
    /// Parameters other than `charset` are dropped. A quoted charset is only
    /// accepted when its unquoted value is a token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Mime>().map_err(ContentError::invalid_media_type)?.try_into()
    }
}

impl TryFrom<Mime> for MediaTypeHeader {
    type Error = ContentError;

    fn try_from(value: Mime) -> Result<Self, Self::Error> {
        let charset = value.get_param(mime::CHARSET).map(|charset| charset.as_str().to_owned());
        if let Some(charset) = &charset {
            ensure!(is_token(charset), ContentError::invalid_media_type(format!("invalid charset '{charset}'")));
        }

        Ok(Self { media_type: value.essence_str().to_owned(), charset })
    }
}

impl TryFrom<&HeaderValue> for MediaTypeHeader {
    type Error = ContentError;

    fn try_from(value: &HeaderValue) -> Result<Self, Self::Error> {
        value.to_str().map_err(ContentError::invalid_media_type)?.parse()
    }
}

// RFC 9110 tchar
fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_charset() {
        let header = MediaTypeHeader::new("foo/bar").unwrap();
        assert_eq!(header.media_type(), "foo/bar");
        assert_eq!(header.charset(), None);
        assert_eq!(header.to_string(), "foo/bar");
    }

    #[test]
    fn test_render_with_charset() {
        let header = MediaTypeHeader::with_charset("application/custom", "utf-8").unwrap();
        assert_eq!(header.to_string(), "application/custom; charset=utf-8");
        assert_eq!(header.to_header_value().unwrap(), "application/custom; charset=utf-8");
    }

    #[test]
    fn test_text_plain_defaults() {
        let header = MediaTypeHeader::text_plain(Charset::default());
        assert_eq!(header.to_string(), "text/plain; charset=utf-8");

        let header = MediaTypeHeader::text_plain(Charset::UsAscii);
        assert_eq!(header.to_string(), "text/plain; charset=us-ascii");
    }

    #[test]
    fn test_or_charset_keeps_existing() {
        let header = MediaTypeHeader::with_charset("text/plain", "ascii").unwrap().or_charset(Charset::Utf8);
        assert_eq!(header.charset(), Some("ascii"));

        let header = MediaTypeHeader::new("text/plain").unwrap().or_charset(Charset::Latin1);
        assert_eq!(header.charset(), Some("iso-8859-1"));
    }

    #[test]
    fn test_invalid_media_types() {
        for media_type in ["", "text", "text/", "/plain", "text/plain; charset=utf-8"] {
            let result = MediaTypeHeader::new(media_type);
            assert!(matches!(result, Err(ContentError::InvalidMediaType { .. })), "{media_type:?} should be rejected");
        }
    }

    #[test]
    fn test_invalid_charset() {
        let result = MediaTypeHeader::with_charset("text/plain", "utf 8");
        assert!(matches!(result, Err(ContentError::InvalidMediaType { .. })));

        let result = MediaTypeHeader::with_charset("text/plain", "");
        assert!(matches!(result, Err(ContentError::InvalidMediaType { .. })));
    }

    #[test]
    fn test_parse_full_value() {
        let header: MediaTypeHeader = "text/html; charset=iso-8859-1".parse().unwrap();
        assert_eq!(header.media_type(), "text/html");
        assert_eq!(header.charset(), Some("iso-8859-1"));

        let header: MediaTypeHeader = "application/json".parse().unwrap();
        assert_eq!(header.charset(), None);
    }

    #[test]
    fn test_from_mime() {
        let header = MediaTypeHeader::try_from(mime::TEXT_PLAIN_UTF_8).unwrap();
        assert_eq!(header.to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_parse_rejects_non_token_charset() {
        let result = "text/plain; charset=\"utf 8\"".parse::<MediaTypeHeader>();
        assert!(matches!(result, Err(ContentError::InvalidMediaType { .. })));
    }

    #[test]
    fn test_parse_render_round_trip() {
        for value in ["text/plain", "text/html; charset=iso-8859-1", "application/json; charset=utf-8"] {
            let header: MediaTypeHeader = value.parse().unwrap();
            let rendered = header.to_string();
            assert_eq!(rendered.parse::<MediaTypeHeader>().unwrap(), header, "{value:?} rendered as {rendered:?}");
            assert!(header.to_header_value().is_ok());
        }
    }

    #[test]
    fn test_from_header_value() {
        let value = HeaderValue::from_static("application/xml; charset=utf-16");
        let header = MediaTypeHeader::try_from(&value).unwrap();
        assert_eq!(header.media_type(), "application/xml");
        assert_eq!(header.charset(), Some("utf-16"));
    }
}
