use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use std::convert::Infallible;
use std::io;
use std::io::Cursor;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncBufRead, AsyncRead, ReadBuf};

/// A readable view over the encoded bytes of a [`TextBody`](crate::TextBody).
///
/// The view can be consumed either as a tokio reader or as an `http_body::Body`
/// that yields everything still unread as a single data frame. Both share one
/// read position, so mixing them never yields a byte twice.
#[derive(Debug, Clone)]
pub struct ByteStream {
    inner: Cursor<Bytes>,
}

impl ByteStream {
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self { inner: Cursor::new(bytes) }
    }

    /// Total length of the encoded payload, read or not.
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.len() - self.position()
    }

    fn position(&self) -> usize {
        let len = self.len();
        usize::try_from(self.inner.position()).map_or(len, |position| position.min(len))
    }

    fn take_remaining(&mut self) -> Bytes {
        let position = self.position();
        let rest = self.inner.get_ref().slice(position..);
        self.inner.set_position(self.len() as u64);
        rest
    }
}

impl AsyncRead for ByteStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_read(cx, buf)
    }
}

impl AsyncBufRead for ByteStream {
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        Pin::new(&mut self.get_mut().inner).poll_fill_buf(cx)
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        Pin::new(&mut self.get_mut().inner).consume(amt);
    }
}

impl HttpBody for ByteStream {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.remaining() == 0 {
            return Poll::Ready(None);
        }
        Poll::Ready(Some(Ok(Frame::data(this.take_remaining()))))
    }

    fn is_end_stream(&self) -> bool {
        self.remaining() == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining() as u64)
    }
}
