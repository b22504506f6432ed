use crate::body::ByteStream;
use crate::utils::ensure;
use crate::{Charset, ContentError, MediaTypeHeader};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, header};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Upper bound of a single sink write in [`TextBody::copy_to_with_cancel`].
const COPY_CHUNK_SIZE: usize = 8 * 1024;

/// An immutable text payload together with its encoding and content type.
///
/// The payload is encoded once when the body is created. Clones share the
/// encoded buffer, and every [`ByteStream`] handed out reads from it.
///
/// # Content type resolution
///
/// - No media type and no header value: `text/plain; charset=<encoding>`.
/// - A media type: `<media type>; charset=<encoding>`.
/// - An explicit header value: that value, with the charset filled in from the
///   encoding only when the value has none and an encoding was supplied.
/// - An explicitly absent header value: no content type at all.
///
/// In every case a missing encoding means UTF-8 for the payload bytes.
#[derive(Debug, Clone)]
pub struct TextBody {
    payload: Arc<str>,
    encoding: Charset,
    content_type: Option<MediaTypeHeader>,
    encoded: Bytes,
}

impl TextBody {
    /// UTF-8 encoded body with a `text/plain; charset=utf-8` content type.
    pub fn new<S: Into<String>>(payload: S) -> Self {
        Self::with_encoding(payload, None)
    }

    /// `None` falls back to UTF-8.
    pub fn with_encoding<S: Into<String>>(payload: S, encoding: Option<Charset>) -> Self {
        let content_type = MediaTypeHeader::text_plain(encoding.unwrap_or_default());
        Self::assemble(payload.into(), encoding, Some(content_type))
    }

    /// Body whose content type is `media_type`, defaulting to `text/plain`, with
    /// the charset of `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidMediaType`] if `media_type` is not a bare
    /// `type/subtype` pair.
    pub fn with_media_type<S: Into<String>>(
        payload: S,
        encoding: Option<Charset>,
        media_type: Option<&str>,
    ) -> Result<Self, ContentError> {
        let content_type = match media_type {
            Some(media_type) => MediaTypeHeader::new(media_type)?.or_charset(encoding.unwrap_or_default()),
            None => MediaTypeHeader::text_plain(encoding.unwrap_or_default()),
        };
        Ok(Self::assemble(payload.into(), encoding, Some(content_type)))
    }

    /// Body with an explicit content-type value, or none at all when `header` is
    /// `None`.
    pub fn with_header<S: Into<String>>(
        payload: S,
        encoding: Option<Charset>,
        header: Option<MediaTypeHeader>,
    ) -> Self {
        let content_type = header.map(|header| match encoding {
            Some(encoding) => header.or_charset(encoding),
            None => header,
        });
        Self::assemble(payload.into(), encoding, content_type)
    }

    /// Same as [`TextBody::with_header`] without an encoding.
    pub fn with_header_only<S: Into<String>>(payload: S, header: Option<MediaTypeHeader>) -> Self {
        Self::with_header(payload, None, header)
    }

    pub fn builder() -> TextBodyBuilder {
        TextBodyBuilder::default()
    }

    fn assemble(payload: String, encoding: Option<Charset>, content_type: Option<MediaTypeHeader>) -> Self {
        let encoding = encoding.unwrap_or_default();
        let encoded = encoding.encode(&payload);
        debug!(
            %encoding,
            content_length = encoded.len(),
            content_type = ?content_type.as_ref().map(ToString::to_string),
            "text body created"
        );

        Self { payload: payload.into(), encoding, content_type, encoded }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn encoding(&self) -> Charset {
        self.encoding
    }

    pub fn content_type(&self) -> Option<&MediaTypeHeader> {
        self.content_type.as_ref()
    }

    /// Length of the encoded payload in bytes.
    pub fn content_length(&self) -> u64 {
        self.encoded.len() as u64
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.encoded
    }

    /// Returns a fresh reader over the encoded payload.
    ///
    /// Every call starts from the first byte and yields the same bytes.
    pub fn as_byte_stream(&self) -> ByteStream {
        ByteStream::new(self.encoded.clone())
    }

    /// Writes the encoded payload to `sink` and flushes it.
    ///
    /// Errors reported by the sink are returned as they are.
    pub async fn copy_to<W>(&self, sink: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        trace!(content_length = self.encoded.len(), "copy text body to sink");
        sink.write_all(&self.encoded).await?;
        sink.flush().await
    }

    /// Like [`TextBody::copy_to`], but stops at the next write boundary once
    /// `token` is cancelled.
    ///
    /// The payload is written in chunks of at most 8 KiB. Bytes written before
    /// cancellation stay in the sink.
    pub async fn copy_to_with_cancel<W>(&self, sink: &mut W, token: &CancellationToken) -> Result<(), ContentError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0usize;
        for chunk in self.encoded.chunks(COPY_CHUNK_SIZE) {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(written, content_length = self.encoded.len(), "copy text body cancelled");
                    return Err(ContentError::Cancelled);
                }
                result = sink.write_all(chunk) => result?,
            }
            written += chunk.len();
            trace!(written, "text body chunk written");
        }

        tokio::select! {
            biased;
            () = token.cancelled() => Err(ContentError::Cancelled),
            result = sink.flush() => Ok(result?),
        }
    }

    /// The `Content-Type` and `Content-Length` entity headers for this body.
    pub fn headers(&self) -> Result<HeaderMap, ContentError> {
        let mut headers = HeaderMap::with_capacity(2);
        if let Some(content_type) = &self.content_type {
            headers.insert(header::CONTENT_TYPE, content_type.to_header_value()?);
        }
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(self.content_length()));
        Ok(headers)
    }

    /// Decodes the encoded payload back into text.
    ///
    /// The charset named by the content-type header wins over the body encoding,
    /// the same way a receiver would read it.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::UnknownCharset`] if the header names a charset
    /// that cannot be resolved.
    pub fn read_to_string(&self) -> Result<String, ContentError> {
        let charset = match self.content_type.as_ref().and_then(MediaTypeHeader::charset) {
            Some(label) => Charset::for_label(label).ok_or_else(|| {
                warn!(charset = label, "content-type names an unknown charset");
                ContentError::unknown_charset(label)
            })?,
            None => self.encoding,
        };
        Ok(charset.decode(&self.encoded).into_owned())
    }
}

impl From<String> for TextBody {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

impl From<&str> for TextBody {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}

impl From<TextBody> for ByteStream {
    fn from(body: TextBody) -> Self {
        ByteStream::new(body.encoded)
    }
}

/// Options for building a [`TextBody`].
///
/// The payload is required. A media type and a header value are mutually
/// exclusive. The header slot tells "not given" apart from "explicitly absent":
/// [`TextBodyBuilder::no_content_type`] suppresses the default `text/plain`
/// header, while leaving the slot untouched keeps it.
#[derive(Debug, Default)]
pub struct TextBodyBuilder {
    payload: Option<String>,
    encoding: Option<Charset>,
    media_type: Option<String>,
    header: Option<Option<MediaTypeHeader>>,
}

impl TextBodyBuilder {
    pub fn payload<S: Into<String>>(mut self, payload: S) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn encoding(mut self, encoding: Charset) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn media_type<S: Into<String>>(mut self, media_type: S) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn header(mut self, header: MediaTypeHeader) -> Self {
        self.header = Some(Some(header));
        self
    }

    pub fn no_content_type(mut self) -> Self {
        self.header = Some(None);
        self
    }

    /// # Errors
    ///
    /// - [`ContentError::MissingPayload`] if no payload was given.
    /// - [`ContentError::ConflictingContentType`] if both a media type and a
    ///   header value were given.
    /// - [`ContentError::InvalidMediaType`] if the media type is malformed.
    pub fn build(self) -> Result<TextBody, ContentError> {
        ensure!(self.media_type.is_none() || self.header.is_none(), ContentError::ConflictingContentType);
        let Some(payload) = self.payload else {
            return Err(ContentError::MissingPayload);
        };

        match (self.header, self.media_type) {
            (Some(header), _) => Ok(TextBody::with_header(payload, self.encoding, header)),
            (None, media_type) => TextBody::with_media_type(payload, self.encoding, media_type.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::AsyncReadExt;

    fn check_send_sync<T: Send + Sync>() {}

    #[test]
    fn is_send_sync() {
        check_send_sync::<TextBody>();
    }

    #[test]
    fn test_builder_requires_payload() {
        let result = TextBody::builder().encoding(Charset::Utf8).build();
        assert!(matches!(result, Err(ContentError::MissingPayload)));
    }

    #[test]
    fn test_builder_rejects_media_type_and_header() {
        let result = TextBody::builder()
            .payload("foo")
            .media_type("text/plain")
            .header(MediaTypeHeader::new("text/plain").unwrap())
            .build();
        assert!(matches!(result, Err(ContentError::ConflictingContentType)));

        let result = TextBody::builder().payload("foo").media_type("text/plain").no_content_type().build();
        assert!(matches!(result, Err(ContentError::ConflictingContentType)));
    }

    #[test]
    fn test_builder_defaults() {
        let body = TextBody::builder().payload("foo").build().unwrap();
        assert_eq!(body.encoding(), Charset::Utf8);
        assert_eq!(body.content_type().unwrap().to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_builder_no_content_type() {
        let body = TextBody::builder().payload("foo").encoding(Charset::UsAscii).no_content_type().build().unwrap();
        assert!(body.content_type().is_none());
        assert_eq!(body.as_bytes().as_ref(), b"foo");
    }

    #[test]
    fn test_builder_invalid_media_type() {
        let result = TextBody::builder().payload("foo").media_type("not a media type").build();
        assert!(matches!(result, Err(ContentError::InvalidMediaType { .. })));
    }

    #[test]
    fn test_headers() {
        let body = TextBody::new("\u{00C4}\u{00E4}");
        let headers = body.headers().unwrap();
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(headers[header::CONTENT_LENGTH], "4");

        let body = TextBody::with_header_only("foo", None);
        let headers = body.headers().unwrap();
        assert!(!headers.contains_key(header::CONTENT_TYPE));
        assert_eq!(headers[header::CONTENT_LENGTH], "3");
    }

    #[test]
    fn test_read_to_string_uses_header_charset() {
        let header = MediaTypeHeader::with_charset("text/plain", "iso-8859-1").unwrap();
        let body = TextBody::with_header("\u{00C4}", None, Some(header));
        assert_eq!(body.as_bytes().as_ref(), "\u{00C4}".as_bytes());
        assert_eq!(body.read_to_string().unwrap(), "\u{00C3}\u{0084}");
    }

    #[test]
    fn test_read_to_string_unknown_charset() {
        let header = MediaTypeHeader::with_charset("text/plain", "x-unknown").unwrap();
        let body = TextBody::with_header_only("foo", Some(header));
        assert!(matches!(body.read_to_string(), Err(ContentError::UnknownCharset { .. })));
    }

    #[test]
    fn test_read_to_string_without_content_type() {
        let body = TextBody::with_header("\u{4f1a}\u{5458}", Some(Charset::Utf16Be), None);
        assert_eq!(body.content_length(), 4);
        assert_eq!(body.read_to_string().unwrap(), "\u{4f1a}\u{5458}");
    }

    #[tokio::test]
    async fn test_byte_stream_is_repeatable() {
        let body = TextBody::new("repeat me");

        for _ in 0..3 {
            let mut buf = String::new();
            body.as_byte_stream().read_to_string(&mut buf).await.unwrap();
            assert_eq!(buf, "repeat me");
        }
    }

    #[tokio::test]
    async fn test_copy_with_cancel_writes_all_chunks() {
        let payload = "x".repeat(COPY_CHUNK_SIZE * 2 + 17);
        let body = TextBody::new(payload.clone());
        let token = CancellationToken::new();

        let mut sink = Vec::new();
        body.copy_to_with_cancel(&mut sink, &token).await.unwrap();

        assert_eq!(sink, payload.as_bytes());
    }

    #[tokio::test]
    async fn test_copy_with_cancel_already_cancelled() {
        let body = TextBody::new("never written");
        let token = CancellationToken::new();
        token.cancel();

        let mut sink = Vec::new();
        let result = body.copy_to_with_cancel(&mut sink, &token).await;

        assert!(matches!(result, Err(ContentError::Cancelled)));
        assert!(sink.is_empty());
    }

    struct BrokenSink;

    impl AsyncWrite for BrokenSink {
        fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_copy_propagates_sink_error() {
        let body = TextBody::new("foo");

        let err = body.copy_to(&mut BrokenSink).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "sink closed");

        let err = body.copy_to_with_cancel(&mut BrokenSink, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, ContentError::Io { ref source } if source.kind() == io::ErrorKind::BrokenPipe));
    }

    #[tokio::test]
    async fn test_copy_empty_body() {
        let body = TextBody::new("");
        let mut sink = Vec::new();
        body.copy_to(&mut sink).await.unwrap();
        assert!(sink.is_empty());
        assert_eq!(body.content_length(), 0);
    }
}
